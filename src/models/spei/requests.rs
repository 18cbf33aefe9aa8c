use super::entities::SpeiStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/spei.ts")]
pub struct SpeiListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    pub status: Option<SpeiStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/spei.ts")]
pub struct GenerateReferenceRequest {
    pub student_id: i64,
    pub concept_id: i64,
    pub debt_id: Option<i64>,
    pub amount: Option<f64>,
}

// 银行回单（自动对账）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/spei.ts")]
pub struct ReconcileRequest {
    pub reference: String,
    pub amount: f64,
    pub tracking_key: Option<String>,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 人工确认
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/spei.ts")]
pub struct VerifyReferenceRequest {
    pub amount: Option<f64>,
    pub tracking_key: Option<String>,
    pub notes: Option<String>,
}

// 存储层插入输入
#[derive(Debug, Clone)]
pub struct NewSpeiReference {
    pub school_id: i64,
    pub student_id: i64,
    pub concept_id: i64,
    pub debt_id: Option<i64>,
    pub reference: String,
    pub amount: f64,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

// 结算输入：参考号转为已付并生成付款记录
#[derive(Debug, Clone)]
pub struct SpeiSettlementInput {
    pub reference_id: i64,
    pub final_status: SpeiStatus,
    pub amount: f64,
    pub tracking_key: Option<String>,
    pub notes: Option<String>,
    pub paid_at: chrono::DateTime<chrono::Utc>,
    pub settled_by: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct SpeiListQuery {
    pub page: i64,
    pub size: i64,
    pub student_id: Option<i64>,
    pub status: Option<SpeiStatus>,
}
