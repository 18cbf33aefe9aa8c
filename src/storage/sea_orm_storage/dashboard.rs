//! 仪表盘汇总查询

use super::SeaOrmStorage;
use crate::entity::{debts, groups, payments, spei_references, students, teachers};
use crate::errors::{AcademiqError, Result};
use crate::models::{
    attendance::entities::AttendanceSummary,
    common::{EnrollmentStatus, round_money},
    dashboard::entities::DashboardSummary,
    debts::entities::DebtStatus,
    payments::entities::PaymentStatus,
    spei::entities::SpeiStatus,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

impl SeaOrmStorage {
    /// 某状态欠款的 (数量, 合计)
    async fn debt_totals(&self, school_id: i64, status: DebtStatus) -> Result<(i64, f64)> {
        let amounts: Vec<f64> = debts::Entity::find()
            .select_only()
            .column(debts::Column::Amount)
            .filter(debts::Column::SchoolId.eq(school_id))
            .filter(debts::Column::Status.eq(status.as_str()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("统计欠款失败: {e}")))?;

        Ok((amounts.len() as i64, amounts.iter().sum()))
    }

    pub async fn dashboard_summary_impl(
        &self,
        school_id: i64,
        now: DateTime<Utc>,
    ) -> Result<DashboardSummary> {
        let active = EnrollmentStatus::Active.as_str();

        let active_students = students::Entity::find()
            .filter(students::Column::SchoolId.eq(school_id))
            .filter(students::Column::Status.eq(active))
            .count(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("统计学生失败: {e}")))?;

        let active_teachers = teachers::Entity::find()
            .filter(teachers::Column::SchoolId.eq(school_id))
            .filter(teachers::Column::Status.eq(active))
            .count(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("统计教师失败: {e}")))?;

        let groups = groups::Entity::find()
            .filter(groups::Column::SchoolId.eq(school_id))
            .count(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("统计班级失败: {e}")))?;

        let (pending_debt_count, pending_debt_total) =
            self.debt_totals(school_id, DebtStatus::Pending).await?;
        let (overdue_debt_count, overdue_debt_total) =
            self.debt_totals(school_id, DebtStatus::Overdue).await?;

        // 本月收入
        let month_start = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc().timestamp())
            .unwrap_or_default();
        let month_amounts: Vec<f64> = payments::Entity::find()
            .select_only()
            .column(payments::Column::Amount)
            .filter(payments::Column::SchoolId.eq(school_id))
            .filter(payments::Column::Status.eq(PaymentStatus::Paid.as_str()))
            .filter(payments::Column::PaidAt.gte(month_start))
            .filter(payments::Column::PaidAt.lte(now.timestamp()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("统计本月收入失败: {e}")))?;

        let pending_spei_references = spei_references::Entity::find()
            .filter(spei_references::Column::SchoolId.eq(school_id))
            .filter(spei_references::Column::Status.eq(SpeiStatus::Pending.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("统计 SPEI 参考号失败: {e}")))?;

        let today = self
            .list_attendance_statuses_on(school_id, now.date_naive())
            .await?;

        Ok(DashboardSummary {
            active_students: active_students as i64,
            active_teachers: active_teachers as i64,
            groups: groups as i64,
            pending_debt_count,
            pending_debt_total: round_money(pending_debt_total),
            overdue_debt_count,
            overdue_debt_total: round_money(overdue_debt_total),
            month_income: round_money(month_amounts.iter().sum()),
            pending_spei_references: pending_spei_references as i64,
            today_attendance_rate: AttendanceSummary::from_statuses(today).attendance_rate,
            generated_at: now,
        })
    }
}
