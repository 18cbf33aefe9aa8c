use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ObservationService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{error_response, require_school, try_response};

pub async fn get_observation(
    service: &ObservationService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    match storage.get_observation_by_id(school_id, id).await {
        Ok(Some(observation)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            observation,
            "Observation retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ObservationNotFound,
            "Observation not found",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve observation", &e)),
    }
}
