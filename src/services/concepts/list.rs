use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ConceptService;
use crate::models::{
    ApiResponse,
    concepts::requests::{ConceptListParams, ConceptListQuery},
};
use crate::services::common::{error_response, require_school, try_response};

pub async fn list_concepts(
    service: &ConceptService,
    query: ConceptListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let list_query = ConceptListQuery {
        page: query.pagination.page,
        size: query.pagination.size,
        active: query.active,
        search: query.search,
    };

    match storage
        .list_concepts_with_pagination(school_id, list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Payment concept list retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve payment concepts", &e)),
    }
}
