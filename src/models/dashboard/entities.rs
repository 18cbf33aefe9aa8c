use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 仪表盘汇总
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardSummary {
    pub active_students: i64,
    pub active_teachers: i64,
    pub groups: i64,
    pub pending_debt_count: i64,
    pub pending_debt_total: f64,
    pub overdue_debt_count: i64,
    pub overdue_debt_total: f64,
    pub month_income: f64,
    pub pending_spei_references: i64,
    pub today_attendance_rate: Option<f64>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
