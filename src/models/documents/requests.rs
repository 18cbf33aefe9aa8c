use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct StudentReportRequest {
    /// 为空时包含全部评价期
    pub period: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct IncomeReportRequest {
    pub date_from: chrono::NaiveDate,
    pub date_to: chrono::NaiveDate,
}

// 存储层插入输入
#[derive(Debug, Clone)]
pub struct NewDocumentHash {
    pub school_id: i64,
    pub document_type: super::entities::DocumentType,
    pub document_id: String,
    pub file_path: String,
    pub sha256: String,
}
