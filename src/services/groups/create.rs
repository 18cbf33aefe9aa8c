use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupService;
use crate::models::{ApiResponse, ErrorCode, groups::requests::CreateGroupRequest};
use crate::services::common::{error_response, require_school, try_response};
use crate::services::teachers::ensure_teacher;

pub async fn create_group(
    service: &GroupService,
    data: CreateGroupRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if data.name.trim().is_empty() || data.cycle.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Group name and cycle are required",
        )));
    }

    let storage = service.get_storage(request);
    try_response!(ensure_teacher(&storage, school_id, data.tutor_id).await);

    match storage.create_group(school_id, data).await {
        Ok(group) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(group, "Group created successfully"))),
        Err(e) if e.is_unique_violation() => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::GroupAlreadyExists,
                "A group with this name already exists in the cycle",
            )))
        }
        Err(e) => Ok(error_response("Group creation failed", &e)),
    }
}
