use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PaymentService, find_payment};
use crate::models::{ApiResponse, ErrorCode, payments::entities::PaymentStatus};
use crate::services::common::{error_response, require_school, try_response};
use crate::services::documents::generate::issue_receipt;

pub async fn regenerate_receipt(
    service: &PaymentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let payment = try_response!(find_payment(&storage, school_id, id).await);
    if payment.status != PaymentStatus::Paid {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::PaymentInvalidState,
            "Receipts are only issued for paid payments",
        )));
    }

    match issue_receipt(&storage, &payment).await {
        Ok(receipt) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            receipt,
            "Receipt generated successfully",
        ))),
        Err(e) => Ok(error_response("Receipt generation failed", &e)),
    }
}
