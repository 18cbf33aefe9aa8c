use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ConceptService;
use crate::models::ApiResponse;
use crate::services::common::{find_concept, require_school, try_response};

pub async fn get_concept(
    service: &ConceptService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let concept = try_response!(find_concept(&storage, school_id, id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        concept,
        "Payment concept retrieved successfully",
    )))
}
