use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ObservationService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::UserRole};
use crate::services::common::{error_response, require_school, try_response};

// 教师只能删除自己写的记录，管理员不受限
pub async fn delete_observation(
    service: &ObservationService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let observation = match storage.get_observation_by_id(school_id, id).await {
        Ok(Some(observation)) => observation,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ObservationNotFound,
                "Observation not found",
            )));
        }
        Err(e) => return Ok(error_response("Failed to retrieve observation", &e)),
    };

    if RequireJWT::extract_user_role(request) != Some(UserRole::Admin)
        && observation.author_id != RequireJWT::extract_user_id(request)
    {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the author or an administrator can delete this observation",
        )));
    }

    match storage.delete_observation(school_id, id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Observation deleted successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ObservationNotFound,
            "Observation not found",
        ))),
        Err(e) => Ok(error_response("Observation deletion failed", &e)),
    }
}
