use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ObservationService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, observations::requests::CreateObservationRequest};
use crate::services::common::{error_response, find_student, require_school, try_response};

pub async fn create_observation(
    service: &ObservationService,
    data: CreateObservationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if data.content.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Observation content is required",
        )));
    }

    let storage = service.get_storage(request);
    try_response!(find_student(&storage, school_id, data.student_id).await);

    let author_id = RequireJWT::extract_user_id(request);
    match storage.create_observation(school_id, author_id, data).await {
        Ok(observation) => Ok(HttpResponse::Created().json(ApiResponse::success(
            observation,
            "Observation created successfully",
        ))),
        Err(e) => Ok(error_response("Observation creation failed", &e)),
    }
}
