use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ConceptService;
use crate::errors::AcademiqError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{error_response, require_school, try_response};

// 已被欠款或付款引用的项目不能删除，只能停用
pub async fn delete_concept(
    service: &ConceptService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    match storage.delete_concept(school_id, id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Payment concept deleted successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ConceptNotFound,
            "Payment concept not found",
        ))),
        Err(AcademiqError::Conflict(_)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ConceptInUse,
                "Payment concept is referenced by debts or payments; deactivate it instead",
            )))
        }
        Err(e) => Ok(error_response("Payment concept deletion failed", &e)),
    }
}
