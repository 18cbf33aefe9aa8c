//! PDF 写入与哈希登记
//!
//! 渲染在阻塞线程池中执行，写完立即计算 SHA-256 并登记，供完整性校验使用。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::errors::{AcademiqError, Result};
use crate::models::{
    documents::{
        entities::{DocumentType, GeneratedDocument},
        requests::NewDocumentHash,
    },
    payments::entities::{Payment, ReceiptResponse},
};
use crate::storage::Storage;
use crate::utils::{
    integrity::sha256_file,
    pdf::{ReceiptData, render_receipt},
    signing::{sign_payment_id, validation_url},
};

/// 生成文档的落盘位置与公开 URL
pub(crate) struct DocumentTarget {
    pub document_type: DocumentType,
    pub document_id: String,
    pub dir: PathBuf,
    pub url_prefix: String,
    pub file_name: String,
}

impl DocumentTarget {
    pub fn receipt(payment_id: i64) -> Self {
        let config = AppConfig::get();
        Self {
            document_type: DocumentType::Receipt,
            document_id: payment_id.to_string(),
            dir: config.receipts_path(),
            url_prefix: config.documents.receipts_dir.clone(),
            file_name: format!("recibo-{payment_id}.pdf"),
        }
    }

    pub fn report(document_id: String, file_name: String) -> Self {
        let config = AppConfig::get();
        Self {
            document_type: DocumentType::Report,
            document_id,
            dir: config.reports_path(),
            url_prefix: config.documents.reports_dir.clone(),
            file_name,
        }
    }

    pub fn url(&self) -> String {
        format!("/{}/{}", self.url_prefix.trim_matches('/'), self.file_name)
    }
}

/// 渲染 PDF、计算哈希并登记
pub(crate) async fn write_document<F>(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    target: DocumentTarget,
    render: F,
) -> Result<GeneratedDocument>
where
    F: FnOnce(&Path) -> Result<()> + Send + 'static,
{
    tokio::fs::create_dir_all(&target.dir).await?;
    let path = target.dir.join(&target.file_name);

    let render_path = path.clone();
    let sha256 = tokio::task::spawn_blocking(move || {
        render(&render_path)?;
        sha256_file(&render_path)
    })
    .await
    .map_err(|e| AcademiqError::document_generation(format!("Render task failed: {e}")))??;

    storage
        .record_document_hash(NewDocumentHash {
            school_id,
            document_type: target.document_type,
            document_id: target.document_id.clone(),
            file_path: path.to_string_lossy().into_owned(),
            sha256: sha256.clone(),
        })
        .await?;

    info!(
        "Generated {} {} ({})",
        target.document_type, target.document_id, sha256
    );

    Ok(GeneratedDocument {
        url: target.url(),
        document_type: target.document_type,
        document_id: target.document_id,
        sha256,
    })
}

/// 为已付款项生成收据（含校验二维码），并回写收据路径
pub(crate) async fn issue_receipt(
    storage: &Arc<dyn Storage>,
    payment: &Payment,
) -> Result<ReceiptResponse> {
    let config = AppConfig::get();

    let school = storage
        .get_school_by_id(payment.school_id)
        .await?
        .ok_or_else(|| AcademiqError::not_found(format!("School {}", payment.school_id)))?;
    let student = storage
        .get_student_by_id(payment.school_id, payment.student_id)
        .await?
        .ok_or_else(|| AcademiqError::not_found(format!("Student {}", payment.student_id)))?;
    let concept = storage
        .get_concept_by_id(payment.school_id, payment.concept_id)
        .await?
        .ok_or_else(|| AcademiqError::not_found(format!("Payment concept {}", payment.concept_id)))?;

    let token = sign_payment_id(&config.validation.secret, payment.id)?;
    let validation_url = validation_url(&config.validation.public_base_url, payment.id, &token);

    let data = ReceiptData {
        school_name: school.name,
        folio: payment.id,
        student_name: student.full_name(),
        enrollment_code: student.enrollment_code,
        concept: concept.name,
        amount: payment.amount,
        method: payment.method.to_string(),
        reference: payment.reference.clone(),
        date: payment
            .paid_at
            .unwrap_or(payment.created_at)
            .format("%d/%m/%Y %H:%M")
            .to_string(),
        status: payment.status.to_string(),
        validation_url: validation_url.clone(),
    };

    let document = write_document(
        storage,
        payment.school_id,
        DocumentTarget::receipt(payment.id),
        move |path| render_receipt(&data, path),
    )
    .await?;

    storage
        .set_payment_receipt_path(payment.id, &document.url)
        .await?;

    Ok(ReceiptResponse {
        payment_id: payment.id,
        receipt_url: document.url,
        sha256: document.sha256,
        validation_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_urls() {
        let target = DocumentTarget {
            document_type: DocumentType::Report,
            document_id: "7-all".to_string(),
            dir: PathBuf::from("public/informes"),
            url_prefix: "/informes/".to_string(),
            file_name: "informe-7-all.pdf".to_string(),
        };
        assert_eq!(target.url(), "/informes/informe-7-all.pdf");

        let receipt = DocumentTarget::receipt(42);
        assert_eq!(receipt.url(), "/recibos/recibo-42.pdf");
        assert_eq!(receipt.document_id, "42");
    }
}
