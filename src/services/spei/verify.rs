use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SpeiService, find_reference, reference_not_pending, settle};
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    spei::{
        entities::SpeiStatus,
        requests::{SpeiSettlementInput, VerifyReferenceRequest},
    },
};
use crate::services::common::{require_school, try_response};
use crate::utils::spei_reference::amount_matches;

/// 人工确认到账；已过期的参考号也可确认，人工取消的不可以
pub async fn verify_reference(
    service: &SpeiService,
    id: i64,
    data: VerifyReferenceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);
    let config = AppConfig::get();

    let reference = try_response!(find_reference(&storage, school_id, id).await);
    if !matches!(reference.status, SpeiStatus::Pending | SpeiStatus::Expired) {
        return Ok(reference_not_pending(&reference));
    }
    if reference.cancelled_at.is_some() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SpeiReferenceNotPending,
            format!("SPEI reference {} was cancelled", reference.reference),
        )));
    }

    let amount = match data.amount {
        Some(amount) if !amount_matches(reference.amount, amount, config.spei.amount_tolerance) => {
            return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                ErrorCode::SpeiAmountMismatch,
                format!(
                    "Received amount {:.2} does not match expected {:.2}",
                    amount, reference.amount
                ),
            )));
        }
        Some(amount) => amount,
        None => reference.amount,
    };

    let input = SpeiSettlementInput {
        reference_id: reference.id,
        final_status: SpeiStatus::Verified,
        amount,
        tracking_key: data.tracking_key,
        notes: data.notes,
        paid_at: chrono::Utc::now(),
        settled_by: RequireJWT::extract_user_id(request),
    };

    let settlement = try_response!(settle(&storage, input).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        settlement,
        "SPEI payment verified successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{TestDb, seeded};
    use actix_web::http::StatusCode;
    use chrono::Duration;

    async fn verify(db: &TestDb, id: i64, amount: Option<f64>) -> StatusCode {
        let service = SpeiService::new_lazy();
        let request = db.admin_request();
        let data = VerifyReferenceRequest {
            amount,
            tracking_key: None,
            notes: Some("Comprobante revisado en caja".to_string()),
        };
        verify_reference(&service, id, data, &request)
            .await
            .unwrap()
            .status()
    }

    async fn status_of(db: &TestDb, id: i64) -> SpeiStatus {
        db.storage
            .get_spei_reference_by_id(db.school.id, id)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    #[actix_web::test]
    async fn test_amount_mismatch_is_rejected() {
        let db = seeded().await;
        let code = format!("ACQ-{}-{}-3D4E5F60", db.student.id, db.concept.id);
        let reference = db.pending_reference(&code, 2500.0, Duration::days(3)).await;

        assert_eq!(
            verify(&db, reference.id, Some(1250.0)).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(&db, reference.id).await, SpeiStatus::Pending);

        assert_eq!(verify(&db, reference.id, None).await, StatusCode::OK);
        assert_eq!(status_of(&db, reference.id).await, SpeiStatus::Verified);
    }

    #[actix_web::test]
    async fn test_expired_reference_can_be_verified() {
        let db = seeded().await;
        let code = format!("ACQ-{}-{}-4E5F6071", db.student.id, db.concept.id);
        let reference = db.pending_reference(&code, 2500.0, Duration::hours(-2)).await;
        db.storage
            .expire_spei_references(Some(db.school.id), chrono::Utc::now())
            .await
            .unwrap();

        assert_eq!(verify(&db, reference.id, Some(2500.0)).await, StatusCode::OK);
        assert_eq!(status_of(&db, reference.id).await, SpeiStatus::Verified);
    }

    #[actix_web::test]
    async fn test_cancelled_reference_cannot_be_verified() {
        let db = seeded().await;
        let code = format!("ACQ-{}-{}-5F607182", db.student.id, db.concept.id);
        let reference = db.pending_reference(&code, 2500.0, Duration::days(3)).await;

        let service = SpeiService::new_lazy();
        let request = db.admin_request();
        let cancelled = super::super::cancel::cancel_reference(&service, reference.id, &request)
            .await
            .unwrap();
        assert_eq!(cancelled.status(), StatusCode::OK);
        assert_eq!(status_of(&db, reference.id).await, SpeiStatus::Expired);

        assert_eq!(verify(&db, reference.id, None).await, StatusCode::CONFLICT);
        assert_eq!(status_of(&db, reference.id).await, SpeiStatus::Expired);
    }
}
