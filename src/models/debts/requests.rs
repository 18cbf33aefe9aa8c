use super::entities::DebtStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/debt.ts")]
pub struct DebtListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub concept_id: Option<i64>,
    pub status: Option<DebtStatus>,
}

// 金额为空时取缴费项目的默认金额
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/debt.ts")]
pub struct CreateDebtRequest {
    pub student_id: i64,
    pub concept_id: i64,
    pub amount: Option<f64>,
    pub due_date: chrono::NaiveDate,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/debt.ts")]
pub struct UpdateDebtRequest {
    pub amount: Option<f64>,
    pub due_date: Option<chrono::NaiveDate>,
    pub status: Option<DebtStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct DebtListQuery {
    pub page: i64,
    pub size: i64,
    pub student_id: Option<i64>,
    pub concept_id: Option<i64>,
    pub status: Option<DebtStatus>,
}
