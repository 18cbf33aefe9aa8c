pub mod generate;
pub mod income_report;
pub mod student_report;
pub mod verify;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::documents::requests::{IncomeReportRequest, StudentReportRequest};
use crate::services::common::define_service;

define_service!(
    /// PDF 报告与文档完整性校验
    DocumentService
);

impl DocumentService {
    pub async fn verify_document(
        &self,
        document_type: String,
        document_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        verify::verify_document(self, document_type, document_id, request).await
    }

    pub async fn student_report(
        &self,
        student_id: i64,
        data: StudentReportRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        student_report::student_report(self, student_id, data, request).await
    }

    pub async fn income_report(
        &self,
        data: IncomeReportRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        income_report::income_report(self, data, request).await
    }
}
