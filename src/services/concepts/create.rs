use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ConceptService;
use crate::models::{ApiResponse, ErrorCode, concepts::requests::CreateConceptRequest};
use crate::services::common::{
    error_response, require_positive_amount, require_school, try_response,
};

pub async fn create_concept(
    service: &ConceptService,
    mut data: CreateConceptRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if data.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Concept name is required",
        )));
    }
    data.default_amount = try_response!(require_positive_amount(data.default_amount));

    let storage = service.get_storage(request);
    match storage.create_concept(school_id, data).await {
        Ok(concept) => Ok(HttpResponse::Created().json(ApiResponse::success(
            concept,
            "Payment concept created successfully",
        ))),
        Err(e) => Ok(error_response("Payment concept creation failed", &e)),
    }
}
