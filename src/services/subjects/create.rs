use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubjectService, ensure_refs};
use crate::models::{ApiResponse, ErrorCode, subjects::requests::CreateSubjectRequest};
use crate::services::common::{error_response, require_school, try_response};

pub async fn create_subject(
    service: &SubjectService,
    data: CreateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if data.name.trim().is_empty() || data.code.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Subject name and code are required",
        )));
    }

    let storage = service.get_storage(request);
    try_response!(ensure_refs(&storage, school_id, data.group_id, data.teacher_id).await);

    match storage.create_subject(school_id, data).await {
        Ok(subject) => Ok(HttpResponse::Created().json(ApiResponse::success(
            subject,
            "Subject created successfully",
        ))),
        Err(e) if e.is_unique_violation() => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SubjectAlreadyExists,
                "Subject code already exists",
            )))
        }
        Err(e) => Ok(error_response("Subject creation failed", &e)),
    }
}
