use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::{SpeiService, reference_not_found, reference_not_pending, settle};
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    spei::{
        entities::SpeiStatus,
        requests::{ReconcileRequest, SpeiSettlementInput},
    },
};
use crate::services::common::{error_response, require_school, try_response};
use crate::utils::spei_reference::{
    ParsedReference, amount_matches, is_expired, parse_reference,
};

/// 按银行回单对账
///
/// 参考号必须存在且为待付；已过期的参考号在此转为 caducado；
/// 金额超出容差时不做任何修改。
pub async fn reconcile(
    service: &SpeiService,
    data: ReconcileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);
    let config = AppConfig::get();

    // 格式不合法的参考号不可能存在
    let submitted = data.reference.trim();
    let Ok(parsed) = parse_reference(submitted) else {
        return Ok(reference_not_found(submitted));
    };

    let mut found = None;
    for code in lookup_candidates(submitted, &parsed, &config.spei.prefix) {
        match storage.get_spei_reference_by_reference(school_id, &code).await {
            Ok(Some(reference)) => {
                found = Some(reference);
                break;
            }
            Ok(None) => {}
            Err(e) => return Ok(error_response("Failed to load SPEI reference", &e)),
        }
    }
    let Some(reference) = found else {
        return Ok(reference_not_found(submitted));
    };

    if reference.status != SpeiStatus::Pending {
        return Ok(reference_not_pending(&reference));
    }

    let now = chrono::Utc::now();
    if is_expired(reference.expires_at, now) {
        if let Err(e) = storage
            .transition_pending_spei_reference(reference.id, SpeiStatus::Expired)
            .await
        {
            return Ok(error_response("Failed to expire SPEI reference", &e));
        }
        warn!("SPEI reference {} arrived after expiry", reference.reference);
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SpeiReferenceExpired,
            format!("SPEI reference {} has expired", reference.reference),
        )));
    }

    if !amount_matches(reference.amount, data.amount, config.spei.amount_tolerance) {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::SpeiAmountMismatch,
            format!(
                "Received amount {:.2} does not match expected {:.2}",
                data.amount, reference.amount
            ),
        )));
    }

    let input = SpeiSettlementInput {
        reference_id: reference.id,
        final_status: SpeiStatus::Paid,
        amount: data.amount,
        tracking_key: data.tracking_key,
        notes: None,
        paid_at: data.paid_at.unwrap_or(now),
        settled_by: RequireJWT::extract_user_id(request),
    };

    let settlement = try_response!(settle(&storage, input).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        settlement,
        "SPEI payment reconciled successfully",
    )))
}

/// 先按回单原文查找，再按规范形式（配置前缀、大写短码）查找
fn lookup_candidates(submitted: &str, parsed: &ParsedReference, prefix: &str) -> Vec<String> {
    let prefix = if parsed.prefix.eq_ignore_ascii_case(prefix) {
        prefix
    } else {
        parsed.prefix.as_str()
    };
    let canonical = format!(
        "{}-{}-{}-{}",
        prefix, parsed.student_id, parsed.concept_id, parsed.short
    );

    let mut candidates = vec![submitted.to_string()];
    if canonical != submitted {
        candidates.push(canonical);
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::spei::entities::SpeiReference;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{TestDb, seeded};
    use crate::utils::spei_reference::generate_reference;
    use actix_web::http::StatusCode;
    use chrono::Duration;

    fn bank_slip(reference: &str, amount: f64) -> ReconcileRequest {
        ReconcileRequest {
            reference: reference.to_string(),
            amount,
            tracking_key: Some("BNET01002503010000123".to_string()),
            paid_at: None,
        }
    }

    async fn reconcile_slip(db: &TestDb, reference: &str, amount: f64) -> StatusCode {
        let service = SpeiService::new_lazy();
        let request = db.admin_request();
        reconcile(&service, bank_slip(reference, amount), &request)
            .await
            .unwrap()
            .status()
    }

    async fn reload(db: &TestDb, reference: &SpeiReference) -> SpeiReference {
        db.storage
            .get_spei_reference_by_id(db.school.id, reference.id)
            .await
            .unwrap()
            .unwrap()
    }

    async fn spei_payment_count(db: &TestDb) -> usize {
        db.storage
            .list_payments_with_pagination(
                db.school.id,
                crate::models::payments::requests::PaymentListQuery {
                    page: 1,
                    size: 50,
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .items
            .len()
    }

    #[test]
    fn test_lookup_candidates() {
        let parsed = parse_reference("acq-7-3-c23bf88d").unwrap();
        assert_eq!(
            lookup_candidates("acq-7-3-c23bf88d", &parsed, "ACQ"),
            vec!["acq-7-3-c23bf88d".to_string(), "ACQ-7-3-C23BF88D".to_string()]
        );

        let parsed = parse_reference("ACQ-7-3-C23BF88D").unwrap();
        assert_eq!(
            lookup_candidates("ACQ-7-3-C23BF88D", &parsed, "ACQ"),
            vec!["ACQ-7-3-C23BF88D".to_string()]
        );
    }

    #[actix_web::test]
    async fn test_lowercase_prefix_reconciles() {
        let db = seeded().await;
        let code = generate_reference("acq", db.student.id, db.concept.id);
        let reference = db.pending_reference(&code, 2500.0, Duration::days(3)).await;

        assert_eq!(reconcile_slip(&db, &code, 2500.5).await, StatusCode::OK);
        let settled = reload(&db, &reference).await;
        assert_eq!(settled.status, SpeiStatus::Paid);
        assert!(settled.payment_id.is_some());
    }

    #[actix_web::test]
    async fn test_unknown_and_malformed_references_are_not_found() {
        let db = seeded().await;
        assert_eq!(
            reconcile_slip(&db, "ACQ-1-1-DEADBEEF", 2500.0).await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            reconcile_slip(&db, "no es referencia", 2500.0).await,
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn test_settled_reference_conflicts_without_changes() {
        let db = seeded().await;
        let code = format!("ACQ-{}-{}-0A1B2C3D", db.student.id, db.concept.id);
        let reference = db.pending_reference(&code, 2500.0, Duration::days(3)).await;

        assert_eq!(reconcile_slip(&db, &code, 2500.0).await, StatusCode::OK);
        let first = reload(&db, &reference).await;

        assert_eq!(reconcile_slip(&db, &code, 2500.0).await, StatusCode::CONFLICT);
        let second = reload(&db, &reference).await;
        assert_eq!(second.status, SpeiStatus::Paid);
        assert_eq!(second.payment_id, first.payment_id);
        assert_eq!(spei_payment_count(&db).await, 1);
    }

    #[actix_web::test]
    async fn test_late_slip_expires_reference() {
        let db = seeded().await;
        let code = format!("ACQ-{}-{}-1B2C3D4E", db.student.id, db.concept.id);
        let reference = db.pending_reference(&code, 2500.0, Duration::hours(-1)).await;

        assert_eq!(reconcile_slip(&db, &code, 2500.0).await, StatusCode::CONFLICT);
        let expired = reload(&db, &reference).await;
        assert_eq!(expired.status, SpeiStatus::Expired);
        assert!(expired.cancelled_at.is_none());
        assert!(expired.payment_id.is_none());
        assert_eq!(spei_payment_count(&db).await, 0);
    }

    #[actix_web::test]
    async fn test_amount_outside_tolerance_leaves_reference_pending() {
        let db = seeded().await;
        let code = format!("ACQ-{}-{}-2C3D4E5F", db.student.id, db.concept.id);
        let reference = db.pending_reference(&code, 2500.0, Duration::days(3)).await;

        assert_eq!(
            reconcile_slip(&db, &code, 2400.0).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        let untouched = reload(&db, &reference).await;
        assert_eq!(untouched.status, SpeiStatus::Pending);
        assert!(untouched.payment_id.is_none());
        assert_eq!(spei_payment_count(&db).await, 0);
    }
}
