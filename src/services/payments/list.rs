use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaymentService;
use crate::models::{
    ApiResponse,
    payments::requests::{PaymentListParams, PaymentListQuery},
};
use crate::services::common::{error_response, require_school, try_response};

pub async fn list_payments(
    service: &PaymentService,
    query: PaymentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let list_query = PaymentListQuery {
        page: query.pagination.page,
        size: query.pagination.size,
        student_id: query.student_id,
        concept_id: query.concept_id,
        method: query.method,
        status: query.status,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    match storage
        .list_payments_with_pagination(school_id, list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Payment list retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve payment list", &e)),
    }
}
