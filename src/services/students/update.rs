use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, ensure_group};
use crate::models::{ApiResponse, ErrorCode, students::requests::UpdateStudentRequest};
use crate::services::common::{error_response, require_school, try_response};
use crate::utils::validate::validate_email;

pub async fn update_student(
    service: &StudentService,
    id: i64,
    data: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
    if blank(&data.enrollment_code) || blank(&data.first_name) || blank(&data.last_name) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Enrollment code and names cannot be empty",
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

    match storage.update_student(school_id, id, data).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) if e.is_unique_violation() => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::StudentAlreadyExists,
                "Enrollment code already exists",
            )))
        }
        Err(e) => Ok(error_response("Student update failed", &e)),
    }
}
