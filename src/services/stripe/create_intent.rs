use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StripeService, stripe_client};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    payments::{
        entities::{CardIntentResponse, PaymentMethod, PaymentStatus},
        requests::{CreateIntentRequest, NewPayment},
    },
};
use crate::services::common::{
    error_response, find_concept, find_student, require_positive_amount, require_school,
    try_response,
};
use crate::services::debts::find_payable_debt;

/// 创建 PaymentIntent 并登记待付的银行卡付款
pub async fn create_intent(
    service: &StripeService,
    data: CreateIntentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let client = try_response!(stripe_client());
    let storage = service.get_storage(request);

    let student = try_response!(find_student(&storage, school_id, data.student_id).await);
    let concept = try_response!(find_concept(&storage, school_id, data.concept_id).await);

    let debt = match data.debt_id {
        Some(debt_id) => Some(try_response!(
            find_payable_debt(&storage, school_id, debt_id, data.student_id, data.concept_id)
                .await
        )),
        None => None,
    };

    let amount = data
        .amount
        .or(debt.as_ref().map(|d| d.amount))
        .unwrap_or(concept.default_amount);
    let amount = try_response!(require_positive_amount(amount));

    let description = format!("{} - {}", concept.name, student.full_name());
    let metadata = [
        ("school_id", school_id.to_string()),
        ("student_id", student.id.to_string()),
        ("concept_id", concept.id.to_string()),
        (
            "debt_id",
            data.debt_id.map(|id| id.to_string()).unwrap_or_default(),
        ),
    ];

    let intent = match client
        .create_payment_intent(amount, &description, &metadata)
        .await
    {
        Ok(intent) => intent,
        Err(e) => return Ok(error_response("Stripe payment intent creation failed", &e)),
    };

    let new_payment = NewPayment {
        school_id,
        student_id: student.id,
        concept_id: concept.id,
        debt_id: data.debt_id,
        amount,
        method: PaymentMethod::Card,
        status: PaymentStatus::Pending,
        reference: None,
        stripe_payment_intent_id: Some(intent.id.clone()),
        notes: None,
        paid_at: None,
        created_by: RequireJWT::extract_user_id(request),
    };

    match storage.register_payment(new_payment).await {
        Ok(payment) => {
            info!(
                "Card payment {} pending on intent {}",
                payment.id, intent.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CardIntentResponse {
                    payment,
                    payment_intent_id: intent.id,
                    client_secret: intent.client_secret,
                },
                "Payment intent created successfully",
            )))
        }
        Err(e) => Ok(error_response("Payment registration failed", &e)),
    }
}
