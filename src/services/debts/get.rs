use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DebtService, find_debt};
use crate::models::ApiResponse;
use crate::services::common::{require_school, try_response};

pub async fn get_debt(
    service: &DebtService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let debt = try_response!(find_debt(&storage, school_id, id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(debt, "Debt retrieved successfully")))
}
