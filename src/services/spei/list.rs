use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SpeiService;
use crate::models::{
    ApiResponse,
    spei::requests::{SpeiListParams, SpeiListQuery},
};
use crate::services::common::{error_response, require_school, try_response};

pub async fn list_references(
    service: &SpeiService,
    query: SpeiListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let list_query = SpeiListQuery {
        page: query.pagination.page,
        size: query.pagination.size,
        student_id: query.student_id,
        status: query.status,
    };

    match storage
        .list_spei_references_with_pagination(school_id, list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "SPEI reference list retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve SPEI references", &e)),
    }
}
