use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, ensure_linked_user};
use crate::models::{ApiResponse, ErrorCode, teachers::requests::CreateTeacherRequest};
use crate::services::common::{error_response, require_school, try_response};
use crate::utils::validate::validate_email;

pub async fn create_teacher(
    service: &TeacherService,
    data: CreateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if data.first_name.trim().is_empty() || data.last_name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "First name and last name are required",
        )));
    }
    if let Err(msg) = validate_email(&data.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);
    try_response!(ensure_linked_user(&storage, school_id, data.user_id).await);

    match storage.create_teacher(school_id, data).await {
        Ok(teacher) => Ok(HttpResponse::Created().json(ApiResponse::success(
            teacher,
            "Teacher created successfully",
        ))),
        Err(e) if e.is_unique_violation() => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::TeacherAlreadyExists,
                "A teacher with this email already exists",
            )))
        }
        Err(e) => Ok(error_response("Teacher creation failed", &e)),
    }
}
