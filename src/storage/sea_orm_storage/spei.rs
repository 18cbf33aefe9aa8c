//! SPEI 参考号存储操作

use super::SeaOrmStorage;
use super::payments::{insert_payment, set_debt_status};
use crate::entity::spei_references::{ActiveModel, Column, Entity as SpeiReferences};
use crate::errors::{AcademiqError, Result};
use crate::models::{
    PaginatedResponse,
    debts::entities::DebtStatus,
    payments::{
        entities::{Payment, PaymentMethod, PaymentStatus},
        requests::NewPayment,
    },
    spei::{
        entities::{SpeiReference, SpeiStatus},
        requests::{NewSpeiReference, SpeiListQuery, SpeiSettlementInput},
    },
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_spei_reference_impl(
        &self,
        reference: NewSpeiReference,
    ) -> Result<SpeiReference> {
        let now = chrono::Utc::now().timestamp();

        let result = ActiveModel {
            school_id: Set(reference.school_id),
            student_id: Set(reference.student_id),
            concept_id: Set(reference.concept_id),
            debt_id: Set(reference.debt_id),
            reference: Set(reference.reference),
            amount: Set(reference.amount),
            status: Set(SpeiStatus::Pending.to_string()),
            expires_at: Set(reference.expires_at.timestamp()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademiqError::database_operation(format!("创建 SPEI 参考号失败: {e}")))?;

        Ok(result.into_spei_reference())
    }

    pub async fn get_spei_reference_by_id_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<SpeiReference>> {
        let result = SpeiReferences::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                AcademiqError::database_operation(format!("查询 SPEI 参考号失败: {e}"))
            })?;

        Ok(result.map(|m| m.into_spei_reference()))
    }

    pub async fn get_spei_reference_by_reference_impl(
        &self,
        school_id: i64,
        reference: &str,
    ) -> Result<Option<SpeiReference>> {
        let result = SpeiReferences::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Reference.eq(reference))
            .one(&self.db)
            .await
            .map_err(|e| {
                AcademiqError::database_operation(format!("查询 SPEI 参考号失败: {e}"))
            })?;

        Ok(result.map(|m| m.into_spei_reference()))
    }

    pub async fn list_spei_references_with_pagination_impl(
        &self,
        school_id: i64,
        query: SpeiListQuery,
    ) -> Result<PaginatedResponse<SpeiReference>> {
        let mut select = SpeiReferences::find().filter(Column::SchoolId.eq(school_id));

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        select = select.order_by_desc(Column::CreatedAt);

        self.paginate(select, query.page, query.size, "SPEI 参考号", |m| {
            m.into_spei_reference()
        })
        .await
    }

    /// 仅在当前为待付时修改状态
    pub async fn transition_pending_spei_reference_impl(
        &self,
        id: i64,
        status: SpeiStatus,
    ) -> Result<bool> {
        let result = SpeiReferences::update_many()
            .col_expr(Column::Status, Expr::value(status.as_str()))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(SpeiStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| {
                AcademiqError::database_operation(format!("更新 SPEI 参考号状态失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 人工取消：与过期同为 caducado，另记取消时间
    pub async fn cancel_pending_spei_reference_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let result = SpeiReferences::update_many()
            .col_expr(Column::Status, Expr::value(SpeiStatus::Expired.as_str()))
            .col_expr(Column::CancelledAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(SpeiStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("取消 SPEI 参考号失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 结算参考号：参考号状态、付款记录、欠款在同一事务中更新
    ///
    /// 自动对账只接受待付参考号；人工确认还接受已过期（非人工取消）的参考号。
    /// 状态以条件更新占用，并发结算只有一方成功。
    pub async fn settle_spei_reference_impl(
        &self,
        input: SpeiSettlementInput,
    ) -> Result<(SpeiReference, Payment)> {
        let mut accepted = vec![SpeiStatus::Pending.as_str()];
        if input.final_status == SpeiStatus::Verified {
            accepted.push(SpeiStatus::Expired.as_str());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(reference) = SpeiReferences::find_by_id(input.reference_id)
            .filter(Column::Status.is_in(accepted))
            .filter(Column::CancelledAt.is_null())
            .one(&txn)
            .await
            .map_err(|e| {
                AcademiqError::database_operation(format!("查询 SPEI 参考号失败: {e}"))
            })?
        else {
            return Err(AcademiqError::conflict(format!(
                "SPEI 参考号 {} 不是可结算状态",
                input.reference_id
            )));
        };

        let payment = insert_payment(
            &txn,
            NewPayment {
                school_id: reference.school_id,
                student_id: reference.student_id,
                concept_id: reference.concept_id,
                debt_id: reference.debt_id,
                amount: input.amount,
                method: PaymentMethod::Spei,
                status: PaymentStatus::Paid,
                reference: Some(reference.reference.clone()),
                stripe_payment_intent_id: None,
                notes: input.notes,
                paid_at: Some(input.paid_at),
                created_by: input.settled_by,
            },
        )
        .await?;

        let settle_error =
            |e: sea_orm::DbErr| AcademiqError::database_operation(format!("结算 SPEI 参考号失败: {e}"));
        let claimed = SpeiReferences::update_many()
            .col_expr(Column::Status, Expr::value(input.final_status.as_str()))
            .col_expr(Column::PaidAt, Expr::value(input.paid_at.timestamp()))
            .col_expr(Column::PaymentId, Expr::value(payment.id))
            .col_expr(
                Column::TrackingKey,
                Expr::value(input.tracking_key.or(reference.tracking_key.clone())),
            )
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(reference.id))
            .filter(Column::Status.eq(reference.status.as_str()))
            .exec(&txn)
            .await
            .map_err(settle_error)?;

        // 已被另一方结算，事务随 txn 丢弃回滚
        if claimed.rows_affected == 0 {
            return Err(AcademiqError::conflict(format!(
                "SPEI 参考号 {} 已被结算",
                reference.reference
            )));
        }

        let settled = SpeiReferences::find_by_id(reference.id)
            .one(&txn)
            .await
            .map_err(settle_error)?
            .ok_or_else(|| {
                AcademiqError::database_operation(format!("SPEI 参考号 {} 丢失", reference.id))
            })?;

        if let Some(debt_id) = reference.debt_id {
            set_debt_status(
                &txn,
                debt_id,
                DebtStatus::Paid,
                Some(input.paid_at.timestamp()),
            )
            .await?;
        }

        txn.commit()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((settled.into_spei_reference(), payment.into_payment()))
    }

    /// 过期的待付参考号转为 caducado
    pub async fn expire_spei_references_impl(
        &self,
        school_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let mut update = SpeiReferences::update_many()
            .col_expr(Column::Status, Expr::value(SpeiStatus::Expired.as_str()))
            .col_expr(Column::UpdatedAt, Expr::value(now.timestamp()))
            .filter(Column::Status.eq(SpeiStatus::Pending.as_str()))
            .filter(Column::ExpiresAt.lt(now.timestamp()));

        if let Some(school_id) = school_id {
            update = update.filter(Column::SchoolId.eq(school_id));
        }

        let result = update.exec(&self.db).await.map_err(|e| {
            AcademiqError::database_operation(format!("标记过期 SPEI 参考号失败: {e}"))
        })?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{TestDb, seeded};
    use crate::models::debts::{entities::DebtStatus, requests::CreateDebtRequest};
    use crate::models::payments::{
        entities::{PaymentMethod, PaymentStatus},
        requests::PaymentListQuery,
    };
    use crate::models::spei::{
        entities::{SpeiReference, SpeiStatus},
        requests::{NewSpeiReference, SpeiSettlementInput},
    };
    use crate::storage::Storage;
    use chrono::{Duration, Utc};

    async fn reference_for_debt(db: &TestDb, code: &str, expires_in: Duration) -> SpeiReference {
        let debt = db
            .storage
            .create_debt(
                db.school.id,
                CreateDebtRequest {
                    student_id: db.student.id,
                    concept_id: db.concept.id,
                    amount: None,
                    due_date: chrono::NaiveDate::from_ymd_opt(2030, 2, 10).unwrap(),
                },
                2500.0,
            )
            .await
            .unwrap();

        db.storage
            .create_spei_reference(NewSpeiReference {
                school_id: db.school.id,
                student_id: db.student.id,
                concept_id: db.concept.id,
                debt_id: Some(debt.id),
                reference: code.to_string(),
                amount: 2500.0,
                expires_at: Utc::now() + expires_in,
            })
            .await
            .unwrap()
    }

    fn settlement(reference: &SpeiReference, final_status: SpeiStatus) -> SpeiSettlementInput {
        SpeiSettlementInput {
            reference_id: reference.id,
            final_status,
            amount: reference.amount,
            tracking_key: Some("CLAVE123".to_string()),
            notes: None,
            paid_at: Utc::now(),
            settled_by: None,
        }
    }

    #[tokio::test]
    async fn test_reconcile_creates_payment_and_settles_debt() {
        let db = seeded().await;
        let reference = reference_for_debt(&db, "ACQ00000001A", Duration::days(3)).await;
        assert_eq!(reference.status, SpeiStatus::Pending);

        let (settled, payment) = db
            .storage
            .settle_spei_reference(settlement(&reference, SpeiStatus::Paid))
            .await
            .unwrap();

        assert_eq!(settled.status, SpeiStatus::Paid);
        assert_eq!(settled.payment_id, Some(payment.id));
        assert_eq!(settled.tracking_key.as_deref(), Some("CLAVE123"));
        assert_eq!(payment.method, PaymentMethod::Spei);
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.reference.as_deref(), Some("ACQ00000001A"));

        let debt = db
            .storage
            .get_debt_by_id(db.school.id, reference.debt_id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(debt.status, DebtStatus::Paid);

        // 同一参考号不能结算两次
        let err = db
            .storage
            .settle_spei_reference(settlement(&reference, SpeiStatus::Paid))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E013");
    }

    #[tokio::test]
    async fn test_expired_reference_only_accepts_manual_verification() {
        let db = seeded().await;
        let reference = reference_for_debt(&db, "ACQ00000002B", Duration::hours(-1)).await;

        let expired = db
            .storage
            .expire_spei_references(Some(db.school.id), Utc::now())
            .await
            .unwrap();
        assert_eq!(expired, 1);

        let current = db
            .storage
            .get_spei_reference_by_reference(db.school.id, "ACQ00000002B")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.status, SpeiStatus::Expired);

        assert!(
            db.storage
                .settle_spei_reference(settlement(&reference, SpeiStatus::Paid))
                .await
                .is_err()
        );

        let (verified, _) = db
            .storage
            .settle_spei_reference(settlement(&reference, SpeiStatus::Verified))
            .await
            .unwrap();
        assert_eq!(verified.status, SpeiStatus::Verified);
    }

    #[tokio::test]
    async fn test_expire_skips_live_references() {
        let db = seeded().await;
        reference_for_debt(&db, "ACQ00000003C", Duration::days(1)).await;

        let expired = db
            .storage
            .expire_spei_references(None, Utc::now())
            .await
            .unwrap();
        assert_eq!(expired, 0);
    }

    #[tokio::test]
    async fn test_transition_only_from_pending() {
        let db = seeded().await;
        let reference = reference_for_debt(&db, "ACQ00000004D", Duration::days(1)).await;

        assert!(
            db.storage
                .transition_pending_spei_reference(reference.id, SpeiStatus::Expired)
                .await
                .unwrap()
        );
        assert!(
            !db.storage
                .transition_pending_spei_reference(reference.id, SpeiStatus::Expired)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_cancelled_reference_cannot_be_verified() {
        let db = seeded().await;
        let reference = reference_for_debt(&db, "ACQ00000005E", Duration::days(1)).await;

        assert!(db.storage.cancel_pending_spei_reference(reference.id).await.unwrap());
        // 已取消的不能再取消
        assert!(!db.storage.cancel_pending_spei_reference(reference.id).await.unwrap());

        let cancelled = db
            .storage
            .get_spei_reference_by_id(db.school.id, reference.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, SpeiStatus::Expired);
        assert!(cancelled.cancelled_at.is_some());

        let err = db
            .storage
            .settle_spei_reference(settlement(&reference, SpeiStatus::Verified))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E013");

        let page = db
            .storage
            .list_payments_with_pagination(
                db.school.id,
                PaymentListQuery {
                    page: 1,
                    size: 20,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(page.items.is_empty());
    }
}
