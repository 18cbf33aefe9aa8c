use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SpeiService, find_reference, reference_not_pending};
use crate::models::{ApiResponse, spei::entities::SpeiStatus};
use crate::services::common::{error_response, require_school, try_response};

/// 人工取消待付参考号；取消后不能再人工确认
pub async fn cancel_reference(
    service: &SpeiService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let reference = try_response!(find_reference(&storage, school_id, id).await);
    if reference.status != SpeiStatus::Pending {
        return Ok(reference_not_pending(&reference));
    }

    match storage.cancel_pending_spei_reference(reference.id).await {
        Ok(true) => {}
        // 期间已被对账、过期或取消
        Ok(false) => {
            let current = try_response!(find_reference(&storage, school_id, id).await);
            return Ok(reference_not_pending(&current));
        }
        Err(e) => return Ok(error_response("Failed to cancel SPEI reference", &e)),
    }

    info!("SPEI reference {} cancelled", reference.reference);
    let reference = try_response!(find_reference(&storage, school_id, id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        reference,
        "SPEI reference cancelled successfully",
    )))
}
