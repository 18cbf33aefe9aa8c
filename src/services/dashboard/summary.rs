use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::DashboardService;
use crate::models::{ApiResponse, dashboard::entities::DashboardSummary};
use crate::services::common::{cache_from_request, error_response, require_school, try_response};

const SUMMARY_TTL_SECS: u64 = 60;

pub(crate) fn summary_cache_key(school_id: i64) -> String {
    format!("dashboard:{school_id}")
}

/// 仪表盘汇总，每所学校缓存 60 秒
pub async fn get_summary(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let cache = cache_from_request(request);
    let cache_key = summary_cache_key(school_id);

    if let Some(cache) = &cache
        && let Some(summary) = cache.get_json::<DashboardSummary>(&cache_key).await
    {
        debug!("Dashboard summary for school {} served from cache", school_id);
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            summary,
            "Dashboard summary retrieved successfully",
        )));
    }

    let storage = service.get_storage(request);
    match storage.dashboard_summary(school_id, chrono::Utc::now()).await {
        Ok(summary) => {
            if let Some(cache) = &cache {
                cache
                    .insert_json(cache_key, &summary, SUMMARY_TTL_SECS)
                    .await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                summary,
                "Dashboard summary retrieved successfully",
            )))
        }
        Err(e) => Ok(error_response("Failed to build dashboard summary", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::summary_cache_key;

    #[test]
    fn test_cache_key_is_per_school() {
        assert_eq!(summary_cache_key(3), "dashboard:3");
        assert_ne!(summary_cache_key(3), summary_cache_key(30));
    }
}
