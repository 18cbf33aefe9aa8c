use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::EnrollmentStatus;
use crate::models::debts::entities::Debt;
use crate::models::payments::entities::Payment;

// 学生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub school_id: i64,
    pub enrollment_code: String,
    pub first_name: String,
    pub last_name: String,
    pub group_id: Option<i64>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: EnrollmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// 学生账户对账单
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentStatement {
    pub student: Student,
    pub debts: Vec<Debt>,
    pub payments: Vec<Payment>,
    /// 未付（待付 + 逾期）欠款合计
    pub total_due: f64,
    /// 已付款合计
    pub total_paid: f64,
    pub overdue_count: i64,
}
