use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupService;
use crate::models::{
    ApiResponse,
    groups::requests::{GroupListParams, GroupListQuery},
};
use crate::services::common::{error_response, require_school, try_response};

pub async fn list_groups(
    service: &GroupService,
    query: GroupListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let list_query = GroupListQuery {
        page: query.pagination.page,
        size: query.pagination.size,
        cycle: query.cycle,
        search: query.search,
    };

    match storage.list_groups_with_pagination(school_id, list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Group list retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve group list", &e)),
    }
}
