use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::{
    ApiResponse,
    subjects::requests::{SubjectListParams, SubjectListQuery},
};
use crate::services::common::{error_response, require_school, try_response};

pub async fn list_subjects(
    service: &SubjectService,
    query: SubjectListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let list_query = SubjectListQuery {
        page: query.pagination.page,
        size: query.pagination.size,
        group_id: query.group_id,
        teacher_id: query.teacher_id,
        search: query.search,
    };

    match storage
        .list_subjects_with_pagination(school_id, list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Subject list retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve subject list", &e)),
    }
}
