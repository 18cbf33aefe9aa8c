use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, ensure_group};
use crate::models::{ApiResponse, ErrorCode, students::requests::CreateStudentRequest};
use crate::services::common::{error_response, require_school, try_response};
use crate::utils::validate::validate_email;

pub async fn create_student(
    service: &StudentService,
    data: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if data.enrollment_code.trim().is_empty()
        || data.first_name.trim().is_empty()
        || data.last_name.trim().is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Enrollment code, first name and last name are required",
        )));
    }
    if let Some(email) = &data.guardian_email
        && let Err(msg) = validate_email(email)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);
    try_response!(ensure_group(&storage, school_id, data.group_id).await);

    match storage.create_student(school_id, data).await {
        Ok(student) => Ok(HttpResponse::Created().json(ApiResponse::success(
            student,
            "Student created successfully",
        ))),
        Err(e) if e.is_unique_violation() => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::StudentAlreadyExists,
                "Enrollment code already exists",
            )))
        }
        Err(e) => Ok(error_response("Student creation failed", &e)),
    }
}
