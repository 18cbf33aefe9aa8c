use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PaymentService, find_payment};
use crate::models::ApiResponse;
use crate::services::common::{require_school, try_response};

pub async fn get_payment(
    service: &PaymentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let payment = try_response!(find_payment(&storage, school_id, id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        payment,
        "Payment retrieved successfully",
    )))
}
