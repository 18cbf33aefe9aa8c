use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{StripeService, apply_outcome, not_configured};
use crate::config::AppConfig;
use crate::integrations::stripe::{IntentOutcome, StripeEvent};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::error_response;
use crate::storage::Storage;
use crate::utils::signing::{STRIPE_SIGNATURE_TOLERANCE_SECS, verify_stripe_signature};

const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Stripe 回调：校验签名后处理 payment_intent.succeeded / payment_failed
///
/// 找不到对应付款的事件照常确认（200），避免 Stripe 无限重试。
pub async fn handle_webhook(
    service: &StripeService,
    body: &[u8],
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let secret = &AppConfig::get().stripe.webhook_secret;
    if secret.is_empty() {
        return Ok(not_configured());
    }

    let signature = request
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    let storage = service.get_storage(request);

    Ok(process_event(&storage, secret, signature, body, chrono::Utc::now().timestamp()).await)
}

/// 校验签名并按事件推进付款
pub(crate) async fn process_event(
    storage: &Arc<dyn Storage>,
    secret: &str,
    signature: Option<&str>,
    body: &[u8],
    now: i64,
) -> HttpResponse {
    let Some(header) = signature else {
        return invalid_signature("Missing Stripe-Signature header");
    };

    if let Err(e) =
        verify_stripe_signature(secret, header, body, now, STRIPE_SIGNATURE_TOLERANCE_SECS)
    {
        warn!("Rejected Stripe webhook: {}", e);
        return invalid_signature(e.message());
    }

    let event: StripeEvent = match serde_json::from_slice(body) {
        Ok(event) => event,
        Err(e) => {
            return HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Invalid Stripe event: {e}"),
            ));
        }
    };

    let outcome = match event.event_type.as_str() {
        "payment_intent.succeeded" => IntentOutcome::Succeeded,
        "payment_intent.payment_failed" => IntentOutcome::Failed,
        other => {
            debug!("Ignoring Stripe event {} ({})", event.id, other);
            return HttpResponse::Ok().json(ApiResponse::success_empty("Event ignored"));
        }
    };

    let Some(intent_id) = event.data.object.get("id").and_then(|v| v.as_str()) else {
        return HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Stripe event has no payment intent id",
        ));
    };

    let payment = match storage.get_payment_by_intent_id(intent_id).await {
        Ok(Some(payment)) => payment,
        Ok(None) => {
            warn!("Stripe event {} for unknown intent {}", event.id, intent_id);
            return HttpResponse::Ok().json(ApiResponse::success_empty("Event ignored"));
        }
        Err(e) => return error_response("Failed to load payment", &e),
    };

    match apply_outcome(storage, payment, outcome).await {
        Ok(_) => HttpResponse::Ok().json(ApiResponse::success_empty("Event processed")),
        Err(e) => error_response("Stripe event processing failed", &e),
    }
}

fn invalid_signature(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::StripeSignatureInvalid,
        message,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payments::{
        entities::{PaymentMethod, PaymentStatus},
        requests::NewPayment,
    };
    use crate::storage::sea_orm_storage::test_support::{TestDb, seeded};
    use crate::utils::signing::stripe_signature_header;
    use actix_web::http::StatusCode;
    use serde_json::json;

    const SECRET: &str = "whsec_test";

    async fn pending_card_payment(db: &TestDb, intent_id: &str) -> i64 {
        db.storage
            .register_payment(NewPayment {
                school_id: db.school.id,
                student_id: db.student.id,
                concept_id: db.concept.id,
                debt_id: None,
                amount: 2500.0,
                method: PaymentMethod::Card,
                status: PaymentStatus::Pending,
                reference: None,
                stripe_payment_intent_id: Some(intent_id.to_string()),
                notes: None,
                paid_at: None,
                created_by: None,
            })
            .await
            .unwrap()
            .id
    }

    fn event(event_type: &str, intent_id: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_1",
            "type": event_type,
            "data": {"object": {"id": intent_id, "object": "payment_intent"}}
        }))
        .unwrap()
    }

    async fn deliver(storage: &Arc<dyn Storage>, body: &[u8]) -> StatusCode {
        let now = chrono::Utc::now().timestamp();
        let header = stripe_signature_header(SECRET, now, body);
        process_event(storage, SECRET, Some(&header), body, now)
            .await
            .status()
    }

    async fn payment_status(db: &TestDb, id: i64) -> PaymentStatus {
        db.storage
            .get_payment_by_id(db.school.id, id)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    #[actix_web::test]
    async fn test_redelivered_success_is_applied_once() {
        let db = seeded().await;
        let storage = db.dyn_storage();
        let id = pending_card_payment(&db, "pi_hook_1").await;
        let body = event("payment_intent.succeeded", "pi_hook_1");

        assert_eq!(deliver(&storage, &body).await, StatusCode::OK);
        let paid = storage.get_payment_by_id(db.school.id, id).await.unwrap().unwrap();
        assert_eq!(paid.status, PaymentStatus::Paid);

        assert_eq!(deliver(&storage, &body).await, StatusCode::OK);
        let again = storage.get_payment_by_id(db.school.id, id).await.unwrap().unwrap();
        assert_eq!(again.paid_at, paid.paid_at);
        assert_eq!(again.receipt_path, paid.receipt_path);

        // 迟到的失败事件不改动已付款项
        let failed = event("payment_intent.payment_failed", "pi_hook_1");
        assert_eq!(deliver(&storage, &failed).await, StatusCode::OK);
        assert_eq!(payment_status(&db, id).await, PaymentStatus::Paid);
    }

    #[actix_web::test]
    async fn test_failed_event_cancels_payment() {
        let db = seeded().await;
        let storage = db.dyn_storage();
        let id = pending_card_payment(&db, "pi_hook_2").await;

        let body = event("payment_intent.payment_failed", "pi_hook_2");
        assert_eq!(deliver(&storage, &body).await, StatusCode::OK);
        assert_eq!(payment_status(&db, id).await, PaymentStatus::Cancelled);
    }

    #[actix_web::test]
    async fn test_bad_signature_and_unknown_intent() {
        let db = seeded().await;
        let storage = db.dyn_storage();
        let id = pending_card_payment(&db, "pi_hook_3").await;
        let body = event("payment_intent.succeeded", "pi_hook_3");
        let now = chrono::Utc::now().timestamp();

        let forged = stripe_signature_header("whsec_other", now, &body);
        let resp = process_event(&storage, SECRET, Some(&forged), &body, now).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = process_event(&storage, SECRET, None, &body, now).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(payment_status(&db, id).await, PaymentStatus::Pending);

        let unknown = event("payment_intent.succeeded", "pi_nobody");
        assert_eq!(deliver(&storage, &unknown).await, StatusCode::OK);
    }
}
