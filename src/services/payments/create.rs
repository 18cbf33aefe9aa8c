use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{PaymentService, with_receipt};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    payments::{
        entities::PaymentStatus,
        requests::{CreatePaymentRequest, NewPayment},
    },
};
use crate::services::common::{
    error_response, find_concept, find_student, require_positive_amount, require_school,
    try_response,
};
use crate::services::debts::find_payable_debt;

/// 柜台登记已收款项：写入付款、结清关联欠款并生成收据
pub async fn create_payment(
    service: &PaymentService,
    data: CreatePaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    try_response!(find_student(&storage, school_id, data.student_id).await);
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

    let new_payment = NewPayment {
        school_id,
        student_id: data.student_id,
        concept_id: data.concept_id,
        debt_id: data.debt_id,
        amount,
        method: data.method,
        status: PaymentStatus::Paid,
        reference: data.reference,
        stripe_payment_intent_id: None,
        notes: data.notes,
        paid_at: Some(data.paid_at.unwrap_or_else(chrono::Utc::now)),
        created_by: RequireJWT::extract_user_id(request),
    };

    let payment = match storage.register_payment(new_payment).await {
        Ok(payment) => payment,
        Err(e) => return Ok(error_response("Payment registration failed", &e)),
    };

    info!(
        "Payment {} registered: student {} amount {} via {}",
        payment.id, payment.student_id, payment.amount, payment.method
    );

    let result = with_receipt(&storage, payment).await;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        result,
        "Payment registered successfully",
    )))
}
