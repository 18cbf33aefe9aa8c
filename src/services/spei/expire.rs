use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SpeiService;
use crate::models::{ApiResponse, spei::entities::ExpireReferencesResponse};
use crate::services::common::{error_response, require_school, try_response};

pub async fn expire_references(
    service: &SpeiService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    match storage
        .expire_spei_references(Some(school_id), chrono::Utc::now())
        .await
    {
        Ok(expired) => {
            info!("Expired {} SPEI references in school {}", expired, school_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ExpireReferencesResponse {
                    expired: expired as i64,
                },
                "Expired SPEI references updated",
            )))
        }
        Err(e) => Ok(error_response("Failed to expire SPEI references", &e)),
    }
}
