use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ConceptService;
use crate::models::{ApiResponse, ErrorCode, concepts::requests::UpdateConceptRequest};
use crate::services::common::{
    error_response, require_positive_amount, require_school, try_response,
};

pub async fn update_concept(
    service: &ConceptService,
    id: i64,
    mut data: UpdateConceptRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if data.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Concept name cannot be empty",
        )));
    }
    if let Some(amount) = data.default_amount {
        data.default_amount = Some(try_response!(require_positive_amount(amount)));
    }

    let storage = service.get_storage(request);
    match storage.update_concept(school_id, id, data).await {
        Ok(Some(concept)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            concept,
            "Payment concept updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ConceptNotFound,
            "Payment concept not found",
        ))),
        Err(e) => Ok(error_response("Payment concept update failed", &e)),
    }
}
