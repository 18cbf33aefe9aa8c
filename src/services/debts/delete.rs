use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DebtService, find_debt};
use crate::models::{ApiResponse, ErrorCode, debts::entities::DebtStatus};
use crate::services::common::{error_response, require_school, try_response};

pub async fn delete_debt(
    service: &DebtService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let debt = try_response!(find_debt(&storage, school_id, id).await);
    if debt.status == DebtStatus::Paid {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::DebtAlreadyPaid,
            "Paid debts cannot be deleted",
        )));
    }

    match storage.delete_debt(school_id, id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Debt deleted successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DebtNotFound,
            "Debt not found",
        ))),
        Err(e) => Ok(error_response("Debt deletion failed", &e)),
    }
}
