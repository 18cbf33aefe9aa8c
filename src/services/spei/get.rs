use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SpeiService, find_reference, reference_not_found};
use crate::models::ApiResponse;
use crate::services::common::{error_response, require_school, try_response};

pub async fn get_reference(
    service: &SpeiService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let reference = try_response!(find_reference(&storage, school_id, id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        reference,
        "SPEI reference retrieved successfully",
    )))
}

pub async fn get_reference_by_code(
    service: &SpeiService,
    reference: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let code = reference.trim().to_uppercase();
    match storage.get_spei_reference_by_reference(school_id, &code).await {
        Ok(Some(reference)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            reference,
            "SPEI reference retrieved successfully",
        ))),
        Ok(None) => Ok(reference_not_found(&code)),
        Err(e) => Ok(error_response("Failed to load SPEI reference", &e)),
    }
}
