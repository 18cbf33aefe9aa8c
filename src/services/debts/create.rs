use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DebtService;
use crate::models::{ApiResponse, ErrorCode, debts::requests::CreateDebtRequest};
use crate::services::common::{
    error_response, find_concept, find_student, require_positive_amount, require_school,
    try_response,
};

// 金额为空时取缴费项目的默认金额
pub async fn create_debt(
    service: &DebtService,
    data: CreateDebtRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    try_response!(find_student(&storage, school_id, data.student_id).await);
    let concept = try_response!(find_concept(&storage, school_id, data.concept_id).await);

    if !concept.active {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            format!("Payment concept {} is inactive", concept.id),
        )));
    }

    let amount = try_response!(require_positive_amount(
        data.amount.unwrap_or(concept.default_amount)
    ));

    match storage.create_debt(school_id, data, amount).await {
        Ok(debt) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(debt, "Debt created successfully"))),
        Err(e) => Ok(error_response("Debt creation failed", &e)),
    }
}
