use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, ensure_linked_user};
use crate::models::{ApiResponse, ErrorCode, teachers::requests::UpdateTeacherRequest};
use crate::services::common::{error_response, require_school, try_response};
use crate::utils::validate::validate_email;

pub async fn update_teacher(
    service: &TeacherService,
    id: i64,
    data: UpdateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if let Some(email) = &data.email
        && let Err(msg) = validate_email(email)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);
    try_response!(ensure_linked_user(&storage, school_id, data.user_id).await);

    match storage.update_teacher(school_id, id, data).await {
        Ok(Some(teacher)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            teacher,
            "Teacher updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            "Teacher not found",
        ))),
        Err(e) if e.is_unique_violation() => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::TeacherAlreadyExists,
                "A teacher with this email already exists",
            )))
        }
        Err(e) => Ok(error_response("Teacher update failed", &e)),
    }
}
