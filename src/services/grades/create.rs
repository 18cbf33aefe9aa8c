use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, check_score};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, grades::requests::CreateGradeRequest};
use crate::services::common::{error_response, find_student, require_school, try_response};

pub async fn create_grade(
    service: &GradeService,
    mut data: CreateGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    try_response!(check_score(data.score));

    data.period = data.period.trim().to_uppercase();
    if data.period.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Period is required",
        )));
    }

    let storage = service.get_storage(request);
    try_response!(find_student(&storage, school_id, data.student_id).await);
    match storage.get_subject_by_id(school_id, data.subject_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubjectNotFound,
                format!("Subject {} not found", data.subject_id),
            )));
        }
        Err(e) => return Ok(error_response("Failed to load subject", &e)),
    }

    let recorded_by = RequireJWT::extract_user_id(request);
    match storage.upsert_grade(school_id, recorded_by, data).await {
        Ok(grade) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(grade, "Grade recorded successfully"))),
        Err(e) => Ok(error_response("Grade recording failed", &e)),
    }
}
