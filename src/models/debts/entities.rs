use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/debt.ts")]
    DebtStatus {
        Pending => "pendiente",
        Overdue => "vencido",
        Paid => "pagado",
    }
}

impl DebtStatus {
    /// 待付或逾期
    pub fn is_outstanding(&self) -> bool {
        matches!(self, DebtStatus::Pending | DebtStatus::Overdue)
    }
}

// 欠款（adeudo）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/debt.ts")]
pub struct Debt {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub concept_id: i64,
    pub amount: f64,
    pub due_date: chrono::NaiveDate,
    pub status: DebtStatus,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
