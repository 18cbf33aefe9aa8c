use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DebtService, find_debt};
use crate::models::{
    ApiResponse, ErrorCode,
    debts::{entities::DebtStatus, requests::UpdateDebtRequest},
};
use crate::services::common::{
    error_response, require_positive_amount, require_school, try_response,
};

/// 修改金额、到期日或在待付/逾期之间切换；结清只能通过付款
pub async fn update_debt(
    service: &DebtService,
    id: i64,
    mut data: UpdateDebtRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if data.status == Some(DebtStatus::Paid) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Debts are settled by registering a payment",
        )));
    }
    if let Some(amount) = data.amount {
        data.amount = Some(try_response!(require_positive_amount(amount)));
    }

    let storage = service.get_storage(request);
    let debt = try_response!(find_debt(&storage, school_id, id).await);
    if debt.status == DebtStatus::Paid {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::DebtAlreadyPaid,
            "Paid debts cannot be modified",
        )));
    }

    match storage.update_debt(school_id, id, data).await {
        Ok(Some(debt)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(debt, "Debt updated successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DebtNotFound,
            "Debt not found",
        ))),
        Err(e) => Ok(error_response("Debt update failed", &e)),
    }
}
