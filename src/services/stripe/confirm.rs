use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{StripeService, apply_outcome, stripe_client};
use crate::integrations::StripeClient;
use crate::integrations::stripe::IntentOutcome;
use crate::models::{
    ApiResponse, ErrorCode,
    payments::entities::{CardConfirmation, PaymentMethod},
};
use crate::services::common::{error_response, require_school, try_response};
use crate::services::payments::find_payment;
use crate::storage::Storage;

pub async fn confirm_payment(
    service: &StripeService,
    payment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let client = try_response!(stripe_client());
    let storage = service.get_storage(request);

    Ok(confirm_with_client(&client, &storage, school_id, payment_id).await)
}

/// 向 Stripe 查询 PaymentIntent 并推进本地付款
pub(crate) async fn confirm_with_client(
    client: &StripeClient,
    storage: &Arc<dyn Storage>,
    school_id: i64,
    payment_id: i64,
) -> HttpResponse {
    let payment = match find_payment(storage, school_id, payment_id).await {
        Ok(payment) => payment,
        Err(response) => return response,
    };
    let intent_id = match (&payment.method, &payment.stripe_payment_intent_id) {
        (PaymentMethod::Card, Some(intent_id)) => intent_id.clone(),
        _ => {
            return HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::PaymentInvalidState,
                format!("Payment {payment_id} is not a card payment"),
            ));
        }
    };

    let intent = match client.retrieve_payment_intent(&intent_id).await {
        Ok(intent) => intent,
        Err(e) => return error_response("Stripe payment intent lookup failed", &e),
    };
    let outcome = intent.outcome();

    let (payment, receipt) = match apply_outcome(storage, payment, outcome).await {
        Ok(result) => result,
        Err(e) => return error_response("Card payment confirmation failed", &e),
    };

    let confirmation = CardConfirmation {
        intent_status: intent.status,
        payment,
        receipt,
    };
    match outcome {
        IntentOutcome::Pending => HttpResponse::Accepted().json(ApiResponse::success(
            confirmation,
            "Card payment is still processing",
        )),
        IntentOutcome::Succeeded => HttpResponse::Ok().json(ApiResponse::success(
            confirmation,
            "Card payment confirmed",
        )),
        IntentOutcome::Failed => HttpResponse::Ok().json(ApiResponse::success(
            confirmation,
            "Card payment failed and was cancelled",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::debts::{entities::DebtStatus, requests::CreateDebtRequest};
    use crate::models::payments::{entities::PaymentStatus, requests::NewPayment};
    use crate::storage::sea_orm_storage::test_support::{TestDb, seeded};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn card_payment(db: &TestDb, intent_id: &str) -> (i64, i64) {
        let debt = db
            .storage
            .create_debt(
                db.school.id,
                CreateDebtRequest {
                    student_id: db.student.id,
                    concept_id: db.concept.id,
                    amount: None,
                    due_date: chrono::NaiveDate::from_ymd_opt(2030, 3, 10).unwrap(),
                },
                2500.0,
            )
            .await
            .unwrap();
        let payment = db
            .storage
            .register_payment(NewPayment {
                school_id: db.school.id,
                student_id: db.student.id,
                concept_id: db.concept.id,
                debt_id: Some(debt.id),
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
            .unwrap();
        (payment.id, debt.id)
    }

    async fn stripe_returning(intent_id: &str, status: &str) -> (MockServer, StripeClient) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/payment_intents/{intent_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": intent_id,
                "status": status,
                "amount": 250000,
                "currency": "mxn",
                "client_secret": null,
                "metadata": {}
            })))
            .mount(&server)
            .await;
        let client = StripeClient::new("sk_test_1", &server.uri(), "mxn").unwrap();
        (server, client)
    }

    #[actix_web::test]
    async fn test_succeeded_intent_settles_payment_and_debt_once() {
        let db = seeded().await;
        let storage = db.dyn_storage();
        let (payment_id, debt_id) = card_payment(&db, "pi_ok_1").await;
        let (_server, client) = stripe_returning("pi_ok_1", "succeeded").await;

        let resp = confirm_with_client(&client, &storage, db.school.id, payment_id).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let paid = storage
            .get_payment_by_id(db.school.id, payment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(paid.status, PaymentStatus::Paid);
        let debt = storage.get_debt_by_id(db.school.id, debt_id).await.unwrap().unwrap();
        assert_eq!(debt.status, DebtStatus::Paid);

        // 第二次确认不再改动付款
        let resp = confirm_with_client(&client, &storage, db.school.id, payment_id).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let again = storage
            .get_payment_by_id(db.school.id, payment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.status, PaymentStatus::Paid);
        assert_eq!(again.paid_at, paid.paid_at);
        assert_eq!(again.updated_at, paid.updated_at);
    }

    #[actix_web::test]
    async fn test_canceled_intent_cancels_pending_payment() {
        let db = seeded().await;
        let storage = db.dyn_storage();
        let (payment_id, debt_id) = card_payment(&db, "pi_ko_1").await;
        let (_server, client) = stripe_returning("pi_ko_1", "canceled").await;

        let resp = confirm_with_client(&client, &storage, db.school.id, payment_id).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let cancelled = storage
            .get_payment_by_id(db.school.id, payment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, PaymentStatus::Cancelled);
        let debt = storage.get_debt_by_id(db.school.id, debt_id).await.unwrap().unwrap();
        assert_eq!(debt.status, DebtStatus::Pending);
    }

    #[actix_web::test]
    async fn test_processing_intent_is_accepted_without_changes() {
        let db = seeded().await;
        let storage = db.dyn_storage();
        let (payment_id, _) = card_payment(&db, "pi_wait_1").await;
        let (_server, client) = stripe_returning("pi_wait_1", "processing").await;

        let resp = confirm_with_client(&client, &storage, db.school.id, payment_id).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::ACCEPTED);
        let payment = storage
            .get_payment_by_id(db.school.id, payment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
    }
}
