use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ObservationService;
use crate::models::{
    ApiResponse,
    observations::requests::{ObservationListParams, ObservationListQuery},
};
use crate::services::common::{error_response, require_school, try_response};

pub async fn list_observations(
    service: &ObservationService,
    query: ObservationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let list_query = ObservationListQuery {
        page: query.pagination.page,
        size: query.pagination.size,
        student_id: query.student_id,
        category: query.category,
    };

    match storage
        .list_observations_with_pagination(school_id, list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Observation list retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve observation list", &e)),
    }
}
