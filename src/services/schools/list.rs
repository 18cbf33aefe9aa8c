use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{
    ApiResponse,
    schools::requests::{SchoolListParams, SchoolListQuery},
};
use crate::services::common::error_response;

pub async fn list_schools(
    service: &SchoolService,
    query: SchoolListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = SchoolListQuery {
        page: query.pagination.page,
        size: query.pagination.size,
        search: query.search,
    };

    match storage.list_schools_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "School list retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve school list", &e)),
    }
}
