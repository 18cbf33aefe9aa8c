use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DebtService;
use crate::models::{
    ApiResponse,
    debts::requests::{DebtListParams, DebtListQuery},
};
use crate::services::common::{error_response, require_school, try_response};

pub async fn list_debts(
    service: &DebtService,
    query: DebtListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let list_query = DebtListQuery {
        page: query.pagination.page,
        size: query.pagination.size,
        student_id: query.student_id,
        concept_id: query.concept_id,
        status: query.status,
    };

    match storage.list_debts_with_pagination(school_id, list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Debt list retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve debt list", &e)),
    }
}
