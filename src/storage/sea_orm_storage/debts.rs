//! 欠款存储操作

use super::SeaOrmStorage;
use crate::entity::debts::{ActiveModel, Column, Entity as Debts};
use crate::entity::format_date_column;
use crate::errors::{AcademiqError, Result};
use crate::models::{
    PaginatedResponse,
    debts::{
        entities::{Debt, DebtStatus},
        requests::{CreateDebtRequest, DebtListQuery, UpdateDebtRequest},
    },
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_debt_impl(
        &self,
        school_id: i64,
        req: CreateDebtRequest,
        amount: f64,
    ) -> Result<Debt> {
        let now = chrono::Utc::now().timestamp();

        let result = ActiveModel {
            school_id: Set(school_id),
            student_id: Set(req.student_id),
            concept_id: Set(req.concept_id),
            amount: Set(amount),
            due_date: Set(format_date_column(req.due_date)),
            status: Set(DebtStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademiqError::database_operation(format!("创建欠款失败: {e}")))?;

        Ok(result.into_debt())
    }

    pub async fn get_debt_by_id_impl(&self, school_id: i64, id: i64) -> Result<Option<Debt>> {
        let result = Debts::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询欠款失败: {e}")))?;

        Ok(result.map(|m| m.into_debt()))
    }

    pub async fn list_debts_with_pagination_impl(
        &self,
        school_id: i64,
        query: DebtListQuery,
    ) -> Result<PaginatedResponse<Debt>> {
        let mut select = Debts::find().filter(Column::SchoolId.eq(school_id));

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(concept_id) = query.concept_id {
            select = select.filter(Column::ConceptId.eq(concept_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        select = select.order_by_asc(Column::DueDate);

        self.paginate(select, query.page, query.size, "欠款", |m| m.into_debt())
            .await
    }

    pub async fn list_student_debts_impl(
        &self,
        school_id: i64,
        student_id: i64,
    ) -> Result<Vec<Debt>> {
        let debts = Debts::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::DueDate)
            .all(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询学生欠款失败: {e}")))?;

        Ok(debts.into_iter().map(|m| m.into_debt()).collect())
    }

    pub async fn update_debt_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateDebtRequest,
    ) -> Result<Option<Debt>> {
        if self.get_debt_by_id_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(amount) = update.amount {
            model.amount = Set(amount);
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(format_date_column(due_date));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
            model.paid_at = Set((status == DebtStatus::Paid).then_some(now));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("更新欠款失败: {e}")))?;

        self.get_debt_by_id_impl(school_id, id).await
    }

    pub async fn delete_debt_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Debts::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("删除欠款失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 到期日早于今天的待付欠款转为逾期
    pub async fn mark_overdue_debts_impl(
        &self,
        school_id: Option<i64>,
        today: NaiveDate,
    ) -> Result<u64> {
        let mut update = Debts::update_many()
            .col_expr(Column::Status, Expr::value(DebtStatus::Overdue.as_str()))
            .col_expr(
                Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Status.eq(DebtStatus::Pending.as_str()))
            .filter(Column::DueDate.lt(format_date_column(today)));

        if let Some(school_id) = school_id {
            update = update.filter(Column::SchoolId.eq(school_id));
        }

        let result = update
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("标记逾期欠款失败: {e}")))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::seeded;
    use crate::models::debts::{entities::DebtStatus, requests::CreateDebtRequest};
    use crate::storage::Storage;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_mark_overdue_only_touches_past_due_pending_debts() {
        let db = seeded().await;
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();

        let mut ids = Vec::new();
        for due in [
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            today,
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        ] {
            let debt = db
                .storage
                .create_debt(
                    db.school.id,
                    CreateDebtRequest {
                        student_id: db.student.id,
                        concept_id: db.concept.id,
                        amount: Some(1200.0),
                        due_date: due,
                    },
                    1200.0,
                )
                .await
                .unwrap();
            ids.push(debt.id);
        }

        let updated = db
            .storage
            .mark_overdue_debts(Some(db.school.id), today)
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let statuses: Vec<DebtStatus> = {
            let mut out = Vec::new();
            for id in &ids {
                let debt = db
                    .storage
                    .get_debt_by_id(db.school.id, *id)
                    .await
                    .unwrap()
                    .unwrap();
                out.push(debt.status);
            }
            out
        };
        assert_eq!(
            statuses,
            vec![DebtStatus::Overdue, DebtStatus::Pending, DebtStatus::Pending]
        );

        // 重复执行不再变化
        assert_eq!(
            db.storage
                .mark_overdue_debts(None, today)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_student_debts_listing() {
        let db = seeded().await;
        db.storage
            .create_debt(
                db.school.id,
                CreateDebtRequest {
                    student_id: db.student.id,
                    concept_id: db.concept.id,
                    amount: None,
                    due_date: NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
                },
                2500.0,
            )
            .await
            .unwrap();

        let debts = db
            .storage
            .list_student_debts(db.school.id, db.student.id)
            .await
            .unwrap();
        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].amount, 2500.0);
        assert!(debts[0].status.is_outstanding());

        let other_school = db
            .storage
            .list_student_debts(db.school.id + 1, db.student.id)
            .await
            .unwrap();
        assert!(other_school.is_empty());
    }
}
