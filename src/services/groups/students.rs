use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupService;
use crate::models::ApiResponse;
use crate::services::common::{error_response, require_school, try_response};
use crate::services::students::ensure_group;

pub async fn list_group_students(
    service: &GroupService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);
    try_response!(ensure_group(&storage, school_id, Some(id)).await);

    match storage.list_students_by_group(school_id, id).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            students,
            "Group students retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve group students", &e)),
    }
}
