use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;
use tracing::info;
use ts_rs::TS;

use super::DebtService;
use crate::models::ApiResponse;
use crate::services::common::{error_response, require_school, try_response};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/debt.ts")]
pub struct MarkOverdueResponse {
    pub updated: i64,
}

pub async fn mark_overdue(service: &DebtService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);
    let today = chrono::Utc::now().date_naive();

    match storage.mark_overdue_debts(Some(school_id), today).await {
        Ok(updated) => {
            info!("Marked {} debts as overdue in school {}", updated, school_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                MarkOverdueResponse {
                    updated: updated as i64,
                },
                "Overdue debts updated",
            )))
        }
        Err(e) => Ok(error_response("Failed to mark overdue debts", &e)),
    }
}
