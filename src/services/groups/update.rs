use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupService;
use crate::models::{ApiResponse, ErrorCode, groups::requests::UpdateGroupRequest};
use crate::services::common::{error_response, require_school, try_response};
use crate::services::teachers::ensure_teacher;

pub async fn update_group(
    service: &GroupService,
    id: i64,
    data: UpdateGroupRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);
    try_response!(ensure_teacher(&storage, school_id, data.tutor_id).await);

    match storage.update_group(school_id, id, data).await {
        Ok(Some(group)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(group, "Group updated successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GroupNotFound,
            "Group not found",
        ))),
        Err(e) if e.is_unique_violation() => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::GroupAlreadyExists,
                "A group with this name already exists in the cycle",
            )))
        }
        Err(e) => Ok(error_response("Group update failed", &e)),
    }
}
