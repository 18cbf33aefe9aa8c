//! 付款存储操作

use super::SeaOrmStorage;
use crate::entity::debts::{ActiveModel as DebtActiveModel, Entity as Debts};
use crate::entity::payments::{ActiveModel, Column, Entity as Payments, Model};
use crate::errors::{AcademiqError, Result};
use crate::models::{
    PaginatedResponse,
    debts::entities::DebtStatus,
    payments::{
        entities::{Payment, PaymentStatus},
        requests::{NewPayment, PaymentListQuery, UpdatePaymentRequest},
    },
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

/// 插入付款记录
pub(super) async fn insert_payment<C: ConnectionTrait>(conn: &C, payment: NewPayment) -> Result<Model> {
    let now = chrono::Utc::now().timestamp();

    ActiveModel {
        school_id: Set(payment.school_id),
        student_id: Set(payment.student_id),
        concept_id: Set(payment.concept_id),
        debt_id: Set(payment.debt_id),
        amount: Set(payment.amount),
        method: Set(payment.method.to_string()),
        status: Set(payment.status.to_string()),
        reference: Set(payment.reference),
        stripe_payment_intent_id: Set(payment.stripe_payment_intent_id),
        notes: Set(payment.notes),
        paid_at: Set(payment.paid_at.map(|t| t.timestamp())),
        created_by: Set(payment.created_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| AcademiqError::database_operation(format!("创建付款失败: {e}")))
}

/// 修改欠款状态，已付时记录付款时间，其余状态清空
pub(super) async fn set_debt_status<C: ConnectionTrait>(
    conn: &C,
    debt_id: i64,
    status: DebtStatus,
    paid_at: Option<i64>,
) -> Result<()> {
    let Some(debt) = Debts::find_by_id(debt_id)
        .one(conn)
        .await
        .map_err(|e| AcademiqError::database_operation(format!("查询欠款失败: {e}")))?
    else {
        return Err(AcademiqError::not_found(format!("欠款 {debt_id} 不存在")));
    };

    DebtActiveModel {
        id: Set(debt.id),
        status: Set(status.to_string()),
        paid_at: Set(paid_at),
        updated_at: Set(chrono::Utc::now().timestamp()),
        ..Default::default()
    }
    .update(conn)
    .await
    .map_err(|e| AcademiqError::database_operation(format!("更新欠款状态失败: {e}")))?;

    Ok(())
}

impl SeaOrmStorage {
    /// 登记付款，已付且关联欠款时同时结清欠款
    pub async fn register_payment_impl(&self, payment: NewPayment) -> Result<Payment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("开启事务失败: {e}")))?;

        let settles_debt = payment.status == PaymentStatus::Paid;
        let paid_at = payment.paid_at.map(|t| t.timestamp());
        let model = insert_payment(&txn, payment).await?;

        if settles_debt && let Some(debt_id) = model.debt_id {
            set_debt_status(&txn, debt_id, DebtStatus::Paid, paid_at).await?;
        }

        txn.commit()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(model.into_payment())
    }

    pub async fn get_payment_by_id_impl(&self, school_id: i64, id: i64) -> Result<Option<Payment>> {
        let result = Payments::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询付款失败: {e}")))?;

        Ok(result.map(|m| m.into_payment()))
    }

    pub async fn get_payment_by_id_unscoped_impl(&self, id: i64) -> Result<Option<Payment>> {
        let result = Payments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询付款失败: {e}")))?;

        Ok(result.map(|m| m.into_payment()))
    }

    pub async fn get_payment_by_intent_id_impl(&self, intent_id: &str) -> Result<Option<Payment>> {
        let result = Payments::find()
            .filter(Column::StripePaymentIntentId.eq(intent_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询付款失败: {e}")))?;

        Ok(result.map(|m| m.into_payment()))
    }

    pub async fn list_payments_with_pagination_impl(
        &self,
        school_id: i64,
        query: PaymentListQuery,
    ) -> Result<PaginatedResponse<Payment>> {
        let mut select = Payments::find().filter(Column::SchoolId.eq(school_id));

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(concept_id) = query.concept_id {
            select = select.filter(Column::ConceptId.eq(concept_id));
        }
        if let Some(method) = query.method {
            select = select.filter(Column::Method.eq(method.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(from) = query.date_from {
            let start = from.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
            select = select.filter(Column::CreatedAt.gte(start.timestamp()));
        }
        if let Some(to) = query.date_to {
            let end = to.and_hms_opt(23, 59, 59).unwrap_or_default().and_utc();
            select = select.filter(Column::CreatedAt.lte(end.timestamp()));
        }

        select = select.order_by_desc(Column::CreatedAt);

        self.paginate(select, query.page, query.size, "付款", |m| {
            m.into_payment()
        })
        .await
    }

    pub async fn list_student_payments_impl(
        &self,
        school_id: i64,
        student_id: i64,
    ) -> Result<Vec<Payment>> {
        let rows = Payments::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询学生付款失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_payment()).collect())
    }

    pub async fn list_paid_payments_between_impl(
        &self,
        school_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Payment>> {
        let rows = Payments::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Status.eq(PaymentStatus::Paid.as_str()))
            .filter(Column::PaidAt.gte(from.timestamp()))
            .filter(Column::PaidAt.lte(to.timestamp()))
            .order_by_asc(Column::PaidAt)
            .all(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询收入失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_payment()).collect())
    }

    /// 更新付款；取消已付款项时关联欠款回到待付
    pub async fn update_payment_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdatePaymentRequest,
    ) -> Result<Option<Payment>> {
        let Some(existing) = self.get_payment_by_id_impl(school_id, id).await? else {
            return Ok(None);
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(reference) = update.reference {
            model.reference = Set(Some(reference));
        }
        if let Some(notes) = update.notes {
            model.notes = Set(Some(notes));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
            if status == PaymentStatus::Cancelled
                && existing.status == PaymentStatus::Paid
                && let Some(debt_id) = existing.debt_id
            {
                set_debt_status(&txn, debt_id, DebtStatus::Pending, None).await?;
            }
        }

        model
            .update(&txn)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("更新付款失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_payment_by_id_impl(school_id, id).await
    }

    /// 待付款转为已付并结清欠款
    ///
    /// 状态以条件更新占用，只有完成转换的调用返回付款；
    /// 付款不存在或已不是待付时返回 None。
    pub async fn settle_payment_impl(
        &self,
        id: i64,
        paid_at: DateTime<Utc>,
    ) -> Result<Option<Payment>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("开启事务失败: {e}")))?;

        let claimed = Payments::update_many()
            .col_expr(Column::Status, Expr::value(PaymentStatus::Paid.to_string()))
            .col_expr(Column::PaidAt, Expr::value(paid_at.timestamp()))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(PaymentStatus::Pending.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("结算付款失败: {e}")))?;
        if claimed.rows_affected == 0 {
            return Ok(None);
        }

        let Some(model) = Payments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询付款失败: {e}")))?
        else {
            return Ok(None);
        };

        if let Some(debt_id) = model.debt_id {
            set_debt_status(&txn, debt_id, DebtStatus::Paid, Some(paid_at.timestamp())).await?;
        }

        txn.commit()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(model.into_payment()))
    }

    /// 取消待付款项；付款不存在或已不是待付时返回 None
    pub async fn cancel_pending_payment_impl(&self, id: i64) -> Result<Option<Payment>> {
        let result = Payments::update_many()
            .col_expr(Column::Status, Expr::value(PaymentStatus::Cancelled.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(PaymentStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("取消付款失败: {e}")))?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_payment_by_id_unscoped_impl(id).await
    }

    pub async fn set_payment_receipt_path_impl(&self, id: i64, receipt_path: &str) -> Result<bool> {
        let result = Payments::update_many()
            .col_expr(Column::ReceiptPath, Expr::value(receipt_path))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("更新收据路径失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 删除付款，已付款项只能取消不能删除
    pub async fn delete_payment_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let Some(existing) = self.get_payment_by_id_impl(school_id, id).await? else {
            return Ok(false);
        };
        if existing.status == PaymentStatus::Paid {
            return Err(AcademiqError::conflict(format!(
                "付款 {id} 已支付，只能取消"
            )));
        }

        let result = Payments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("删除付款失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{TestDb, seeded};
    use crate::models::debts::{entities::DebtStatus, requests::CreateDebtRequest};
    use crate::models::payments::{
        entities::{PaymentMethod, PaymentStatus},
        requests::{NewPayment, UpdatePaymentRequest},
    };
    use crate::storage::Storage;

    async fn open_debt(db: &TestDb) -> i64 {
        db.storage
            .create_debt(
                db.school.id,
                CreateDebtRequest {
                    student_id: db.student.id,
                    concept_id: db.concept.id,
                    amount: None,
                    due_date: chrono::NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
                },
                2500.0,
            )
            .await
            .expect("create debt")
            .id
    }

    fn cash_payment(db: &TestDb, debt_id: Option<i64>, status: PaymentStatus) -> NewPayment {
        NewPayment {
            school_id: db.school.id,
            student_id: db.student.id,
            concept_id: db.concept.id,
            debt_id,
            amount: 2500.0,
            method: PaymentMethod::Cash,
            status,
            reference: None,
            stripe_payment_intent_id: None,
            notes: None,
            paid_at: (status == PaymentStatus::Paid).then(chrono::Utc::now),
            created_by: Some(db.admin.id),
        }
    }

    #[tokio::test]
    async fn test_paid_payment_settles_debt() {
        let db = seeded().await;
        let debt_id = open_debt(&db).await;

        let payment = db
            .storage
            .register_payment(cash_payment(&db, Some(debt_id), PaymentStatus::Paid))
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Paid);

        let debt = db
            .storage
            .get_debt_by_id(db.school.id, debt_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(debt.status, DebtStatus::Paid);
        assert!(debt.paid_at.is_some());
    }

    #[tokio::test]
    async fn test_cancelling_paid_payment_reopens_debt() {
        let db = seeded().await;
        let debt_id = open_debt(&db).await;
        let payment = db
            .storage
            .register_payment(cash_payment(&db, Some(debt_id), PaymentStatus::Paid))
            .await
            .unwrap();

        let cancelled = db
            .storage
            .update_payment(
                db.school.id,
                payment.id,
                UpdatePaymentRequest {
                    status: Some(PaymentStatus::Cancelled),
                    reference: None,
                    notes: Some("Error de captura".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, PaymentStatus::Cancelled);

        let debt = db
            .storage
            .get_debt_by_id(db.school.id, debt_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(debt.status, DebtStatus::Pending);
        assert!(debt.paid_at.is_none());
    }

    #[tokio::test]
    async fn test_pending_card_payment_settles_once() {
        let db = seeded().await;
        let debt_id = open_debt(&db).await;
        let mut pending = cash_payment(&db, Some(debt_id), PaymentStatus::Pending);
        pending.method = PaymentMethod::Card;
        pending.stripe_payment_intent_id = Some("pi_test_123".to_string());
        let payment = db.storage.register_payment(pending).await.unwrap();

        // 待付款不影响欠款
        let debt = db
            .storage
            .get_debt_by_id(db.school.id, debt_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(debt.status, DebtStatus::Pending);

        let found = db
            .storage
            .get_payment_by_intent_id("pi_test_123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, payment.id);

        let settled = db
            .storage
            .settle_payment(payment.id, chrono::Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(settled.status, PaymentStatus::Paid);
        let paid_at = settled.paid_at;

        // 重复的成功回调不会再次结算
        assert!(
            db.storage
                .settle_payment(payment.id, chrono::Utc::now() + chrono::Duration::hours(1))
                .await
                .unwrap()
                .is_none()
        );
        // 迟到的失败回调不会改动已付款项
        assert!(
            db.storage
                .cancel_pending_payment(payment.id)
                .await
                .unwrap()
                .is_none()
        );

        let current = db
            .storage
            .get_payment_by_id(db.school.id, payment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.status, PaymentStatus::Paid);
        assert_eq!(current.paid_at, paid_at);
        assert!(db.storage.settle_payment(9999, chrono::Utc::now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_paid_payment_cannot_be_deleted() {
        let db = seeded().await;
        let paid = db
            .storage
            .register_payment(cash_payment(&db, None, PaymentStatus::Paid))
            .await
            .unwrap();
        let err = db
            .storage
            .delete_payment(db.school.id, paid.id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E013");

        let pending = db
            .storage
            .register_payment(cash_payment(&db, None, PaymentStatus::Pending))
            .await
            .unwrap();
        assert!(
            db.storage
                .delete_payment(db.school.id, pending.id)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_payments_are_scoped_by_school() {
        let db = seeded().await;
        let payment = db
            .storage
            .register_payment(cash_payment(&db, None, PaymentStatus::Paid))
            .await
            .unwrap();

        assert!(
            db.storage
                .get_payment_by_id(db.school.id + 1, payment.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            db.storage
                .get_payment_by_id_unscoped(payment.id)
                .await
                .unwrap()
                .is_some()
        );
    }
}
