pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod receipt;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use crate::models::{
    ApiResponse, ErrorCode,
    payments::{
        entities::{Payment, PaymentWithReceipt},
        requests::{CreatePaymentRequest, PaymentListParams, UpdatePaymentRequest},
    },
};
use crate::services::common::{define_service, error_response};
use crate::services::documents::generate::issue_receipt;
use crate::storage::Storage;

define_service!(
    /// 付款登记与收据
    PaymentService
);

impl PaymentService {
    pub async fn list_payments(
        &self,
        query: PaymentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_payments(self, query, request).await
    }

    pub async fn create_payment(
        &self,
        data: CreatePaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_payment(self, data, request).await
    }

    pub async fn get_payment(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_payment(self, id, request).await
    }

    pub async fn update_payment(
        &self,
        id: i64,
        data: UpdatePaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_payment(self, id, data, request).await
    }

    pub async fn delete_payment(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_payment(self, id, request).await
    }

    // 重新生成收据
    pub async fn regenerate_receipt(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        receipt::regenerate_receipt(self, id, request).await
    }
}

pub(crate) async fn find_payment(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    payment_id: i64,
) -> Result<Payment, HttpResponse> {
    match storage.get_payment_by_id(school_id, payment_id).await {
        Ok(Some(payment)) => Ok(payment),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PaymentNotFound,
            format!("Payment {payment_id} not found"),
        ))),
        Err(e) => Err(error_response("Failed to load payment", &e)),
    }
}

/// 付款已入账后生成收据；收据失败只记录日志，付款本身不回滚
pub(crate) async fn with_receipt(storage: &Arc<dyn Storage>, payment: Payment) -> PaymentWithReceipt {
    match issue_receipt(storage, &payment).await {
        Ok(receipt) => {
            let mut payment = payment;
            payment.receipt_path = Some(receipt.receipt_url.clone());
            PaymentWithReceipt {
                payment,
                receipt: Some(receipt),
            }
        }
        Err(e) => {
            error!("Failed to issue receipt for payment {}: {}", payment.id, e);
            PaymentWithReceipt {
                payment,
                receipt: None,
            }
        }
    }
}
