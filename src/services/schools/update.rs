use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, ErrorCode, schools::requests::UpdateSchoolRequest};
use crate::services::common::error_response;
use crate::utils::validate::validate_clabe;

pub async fn update_school(
    service: &SchoolService,
    id: i64,
    data: UpdateSchoolRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(clabe) = &data.clabe
        && let Err(msg) = validate_clabe(clabe)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    if data.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "School name cannot be empty",
        )));
    }

    let storage = service.get_storage(request);
    match storage.update_school(id, data).await {
        Ok(Some(school)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            school,
            "School updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SchoolNotFound,
            "School not found",
        ))),
        Err(e) => Ok(error_response("School update failed", &e)),
    }
}
