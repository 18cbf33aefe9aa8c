use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::PathBuf;
use std::sync::Arc;

use super::DocumentService;
use crate::errors::{AcademiqError, Result};
use crate::models::{
    ApiResponse, ErrorCode,
    documents::entities::{DocumentType, IntegrityReport, IntegrityStatus},
};
use crate::services::common::{error_response, require_school, try_response};
use crate::storage::Storage;
use crate::utils::integrity::sha256_file;

pub async fn verify_document(
    service: &DocumentService,
    document_type: String,
    document_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    let document_type: DocumentType = match document_type.parse() {
        Ok(t) => t,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, e)));
        }
    };

    let storage = service.get_storage(request);
    match check_integrity(&storage, Some(school_id), document_type, &document_id).await {
        Ok(Some(report)) => {
            let message = match report.status {
                IntegrityStatus::Valid => "Document is intact",
                IntegrityStatus::Tampered => "Document hash does not match",
                IntegrityStatus::Missing => "Document file is missing",
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(report, message)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DocumentNotFound,
            format!("No integrity record for {document_type} {document_id}"),
        ))),
        Err(e) => Ok(error_response("Integrity check failed", &e)),
    }
}

/// 重新计算最新登记文件的哈希并比对；没有登记记录时返回 None
pub(crate) async fn check_integrity(
    storage: &Arc<dyn Storage>,
    school_id: Option<i64>,
    document_type: DocumentType,
    document_id: &str,
) -> Result<Option<IntegrityReport>> {
    let Some(record) = storage
        .get_latest_document_hash(school_id, document_type, document_id)
        .await?
    else {
        return Ok(None);
    };

    let path = PathBuf::from(&record.file_path);
    let actual = tokio::task::spawn_blocking(move || {
        if path.exists() {
            sha256_file(&path).map(Some)
        } else {
            Ok(None)
        }
    })
    .await
    .map_err(|e| AcademiqError::file_operation(format!("Hash task failed: {e}")))??;

    Ok(Some(IntegrityReport {
        status: integrity_status(&record.sha256, actual.as_deref()),
        document_type: record.document_type,
        document_id: record.document_id,
        expected_sha256: record.sha256,
        actual_sha256: actual,
        recorded_at: record.created_at,
        checked_at: chrono::Utc::now(),
    }))
}

pub(crate) fn integrity_status(expected: &str, actual: Option<&str>) -> IntegrityStatus {
    match actual {
        None => IntegrityStatus::Missing,
        Some(actual) if actual.eq_ignore_ascii_case(expected) => IntegrityStatus::Valid,
        Some(_) => IntegrityStatus::Tampered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::documents::generate::{DocumentTarget, write_document};
    use crate::storage::sea_orm_storage::test_support::seeded;

    #[test]
    fn test_integrity_status() {
        let hash = "ab12";
        assert_eq!(integrity_status(hash, Some("AB12")), IntegrityStatus::Valid);
        assert_eq!(integrity_status(hash, Some("ab13")), IntegrityStatus::Tampered);
        assert_eq!(integrity_status(hash, None), IntegrityStatus::Missing);
    }

    #[actix_web::test]
    async fn test_integrity_follows_file_on_disk() {
        let db = seeded().await;
        let storage = db.dyn_storage();
        let dir = tempfile::tempdir().unwrap();

        let target = DocumentTarget {
            document_type: DocumentType::Receipt,
            document_id: "77".to_string(),
            dir: dir.path().join("recibos"),
            url_prefix: "recibos".to_string(),
            file_name: "recibo-77.pdf".to_string(),
        };
        let document = write_document(&storage, db.school.id, target, |path| {
            std::fs::write(path, b"%PDF-1.4 recibo 77")?;
            Ok(())
        })
        .await
        .unwrap();
        assert_eq!(document.url, "/recibos/recibo-77.pdf");

        let check = || check_integrity(&storage, Some(db.school.id), DocumentType::Receipt, "77");
        let report = check().await.unwrap().unwrap();
        assert_eq!(report.status, IntegrityStatus::Valid);
        assert_eq!(report.expected_sha256, document.sha256);

        let path = dir.path().join("recibos").join("recibo-77.pdf");
        std::fs::write(&path, b"%PDF-1.4 recibo 77 alterado").unwrap();
        let report = check().await.unwrap().unwrap();
        assert_eq!(report.status, IntegrityStatus::Tampered);
        assert_ne!(report.actual_sha256.as_deref(), Some(document.sha256.as_str()));

        std::fs::remove_file(&path).unwrap();
        let report = check().await.unwrap().unwrap();
        assert_eq!(report.status, IntegrityStatus::Missing);
        assert!(report.actual_sha256.is_none());

        // 其他学校看不到这条登记
        assert!(
            check_integrity(&storage, Some(db.school.id + 1), DocumentType::Receipt, "77")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn test_unregistered_document_is_not_found() {
        let db = seeded().await;
        let service = DocumentService::new_lazy();
        let request = db.admin_request();

        let resp = verify_document(&service, "recibo".to_string(), "404".to_string(), &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

        let resp = verify_document(&service, "diploma".to_string(), "1".to_string(), &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
