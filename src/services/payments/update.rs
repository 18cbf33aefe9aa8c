use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{PaymentService, find_payment};
use crate::models::{
    ApiResponse, ErrorCode,
    payments::{entities::PaymentStatus, requests::UpdatePaymentRequest},
};
use crate::services::common::{error_response, require_school, try_response};

/// 修改备注/参考号或取消付款（取消已付款项时欠款恢复为待付）
pub async fn update_payment(
    service: &PaymentService,
    id: i64,
    data: UpdatePaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let payment = try_response!(find_payment(&storage, school_id, id).await);

    if let Some(status) = data.status {
        if status != PaymentStatus::Cancelled {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::PaymentInvalidState,
                "Payments can only be cancelled through this endpoint",
            )));
        }
        if payment.status == PaymentStatus::Cancelled {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::PaymentInvalidState,
                format!("Payment {id} is already cancelled"),
            )));
        }
    }

    let cancelling = data.status.is_some();
    match storage.update_payment(school_id, id, data).await {
        Ok(Some(payment)) => {
            if cancelling {
                info!("Payment {} cancelled", payment.id);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                payment,
                "Payment updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PaymentNotFound,
            "Payment not found",
        ))),
        Err(e) => Ok(error_response("Payment update failed", &e)),
    }
}
