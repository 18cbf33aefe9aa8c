//! Stripe 银行卡付款

pub mod confirm;
pub mod create_intent;
pub mod webhook;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::errors::{AcademiqError, Result};
use crate::integrations::StripeClient;
use crate::integrations::stripe::IntentOutcome;
use crate::models::{
    ApiResponse, ErrorCode,
    payments::{
        entities::{Payment, PaymentStatus, ReceiptResponse},
        requests::CreateIntentRequest,
    },
};
use crate::services::common::{define_service, error_response};
use crate::services::documents::generate::issue_receipt;
use crate::storage::Storage;

define_service!(StripeService);

impl StripeService {
    pub async fn create_intent(
        &self,
        data: CreateIntentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create_intent::create_intent(self, data, request).await
    }

    // 服务端确认
    pub async fn confirm_payment(
        &self,
        payment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        confirm::confirm_payment(self, payment_id, request).await
    }

    // body 必须是原始字节，签名基于原文计算
    pub async fn handle_webhook(
        &self,
        body: &[u8],
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        webhook::handle_webhook(self, body, request).await
    }
}

pub(crate) fn stripe_client() -> std::result::Result<StripeClient, HttpResponse> {
    match StripeClient::from_config(&AppConfig::get().stripe) {
        Ok(Some(client)) => Ok(client),
        Ok(None) => Err(not_configured()),
        Err(e) => Err(error_response("Stripe client initialization failed", &e)),
    }
}

pub(crate) fn not_configured() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
        ErrorCode::StripeNotConfigured,
        "Card payments are not configured",
    ))
}

/// 按 PaymentIntent 状态推进本地付款
///
/// 只处理待付款项，已付或已取消的付款原样返回。状态转换由存储层条件更新占用，
/// 回调与确认并发到达时只有一方出收据。
pub(crate) async fn apply_outcome(
    storage: &Arc<dyn Storage>,
    payment: Payment,
    outcome: IntentOutcome,
) -> Result<(Payment, Option<ReceiptResponse>)> {
    if payment.status != PaymentStatus::Pending {
        return Ok((payment, None));
    }

    match outcome {
        IntentOutcome::Succeeded => {
            let Some(settled) = storage.settle_payment(payment.id, chrono::Utc::now()).await?
            else {
                info!("Card payment {} already handled elsewhere", payment.id);
                return Ok((current_payment(storage, payment.id).await?, None));
            };
            info!(
                "Card payment {} settled ({})",
                settled.id, settled.amount
            );

            let receipt = match issue_receipt(storage, &settled).await {
                Ok(receipt) => Some(receipt),
                Err(e) => {
                    error!("Failed to issue receipt for payment {}: {}", settled.id, e);
                    None
                }
            };
            Ok((settled, receipt))
        }
        IntentOutcome::Failed => {
            let Some(cancelled) = storage.cancel_pending_payment(payment.id).await? else {
                return Ok((current_payment(storage, payment.id).await?, None));
            };
            warn!("Card payment {} failed, cancelled", cancelled.id);
            Ok((cancelled, None))
        }
        IntentOutcome::Pending => Ok((payment, None)),
    }
}

async fn current_payment(storage: &Arc<dyn Storage>, id: i64) -> Result<Payment> {
    storage
        .get_payment_by_id_unscoped(id)
        .await?
        .ok_or_else(|| AcademiqError::not_found(format!("Payment {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payments::{entities::PaymentMethod, requests::NewPayment};
    use crate::storage::sea_orm_storage::test_support::seeded;

    #[actix_web::test]
    async fn test_stale_pending_snapshot_settles_once() {
        let db = seeded().await;
        let storage = db.dyn_storage();
        let pending = storage
            .register_payment(NewPayment {
                school_id: db.school.id,
                student_id: db.student.id,
                concept_id: db.concept.id,
                debt_id: None,
                amount: 2500.0,
                method: PaymentMethod::Card,
                status: PaymentStatus::Pending,
                reference: None,
                stripe_payment_intent_id: Some("pi_race_1".to_string()),
                notes: None,
                paid_at: None,
                created_by: None,
            })
            .await
            .unwrap();

        // 确认与回调读到同一份待付快照
        let (first, _) = apply_outcome(&storage, pending.clone(), IntentOutcome::Succeeded)
            .await
            .unwrap();
        assert_eq!(first.status, PaymentStatus::Paid);

        let (second, receipt) = apply_outcome(&storage, pending.clone(), IntentOutcome::Succeeded)
            .await
            .unwrap();
        assert_eq!(second.status, PaymentStatus::Paid);
        assert_eq!(second.paid_at, first.paid_at);
        assert!(receipt.is_none());

        let (late_failure, _) = apply_outcome(&storage, pending, IntentOutcome::Failed)
            .await
            .unwrap();
        assert_eq!(late_failure.status, PaymentStatus::Paid);
    }
}
