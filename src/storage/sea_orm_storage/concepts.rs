//! 缴费项目存储操作

use super::SeaOrmStorage;
use crate::entity::debts::{Column as DebtColumn, Entity as Debts};
use crate::entity::payment_concepts::{ActiveModel, Column, Entity as PaymentConcepts};
use crate::entity::payments::{Column as PaymentColumn, Entity as Payments};
use crate::errors::{AcademiqError, Result};
use crate::models::{
    PaginatedResponse,
    concepts::{
        entities::PaymentConcept,
        requests::{ConceptListQuery, CreateConceptRequest, UpdateConceptRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_concept_impl(
        &self,
        school_id: i64,
        req: CreateConceptRequest,
    ) -> Result<PaymentConcept> {
        let now = chrono::Utc::now().timestamp();

        let result = ActiveModel {
            school_id: Set(school_id),
            name: Set(req.name),
            description: Set(req.description),
            default_amount: Set(req.default_amount),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademiqError::database_operation(format!("创建缴费项目失败: {e}")))?;

        Ok(result.into_concept())
    }

    pub async fn get_concept_by_id_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<PaymentConcept>> {
        let result = PaymentConcepts::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询缴费项目失败: {e}")))?;

        Ok(result.map(|m| m.into_concept()))
    }

    pub async fn list_concepts_with_pagination_impl(
        &self,
        school_id: i64,
        query: ConceptListQuery,
    ) -> Result<PaginatedResponse<PaymentConcept>> {
        let mut select = PaymentConcepts::find().filter(Column::SchoolId.eq(school_id));

        if let Some(active) = query.active {
            select = select.filter(Column::Active.eq(active));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.contains(escape_like_pattern(search.trim())));
        }

        select = select.order_by_asc(Column::Name);

        self.paginate(select, query.page, query.size, "缴费项目", |m| {
            m.into_concept()
        })
        .await
    }

    pub async fn update_concept_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateConceptRequest,
    ) -> Result<Option<PaymentConcept>> {
        if self.get_concept_by_id_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(amount) = update.default_amount {
            model.default_amount = Set(amount);
        }
        if let Some(active) = update.active {
            model.active = Set(active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("更新缴费项目失败: {e}")))?;

        self.get_concept_by_id_impl(school_id, id).await
    }

    /// 删除缴费项目，已被欠款或付款引用时返回冲突
    pub async fn delete_concept_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let debts = Debts::find()
            .filter(DebtColumn::ConceptId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("统计欠款失败: {e}")))?;
        let payments = Payments::find()
            .filter(PaymentColumn::ConceptId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("统计付款失败: {e}")))?;

        if debts + payments > 0 {
            return Err(AcademiqError::conflict(format!(
                "缴费项目 {id} 已被 {debts} 条欠款和 {payments} 条付款引用"
            )));
        }

        let result = PaymentConcepts::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("删除缴费项目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
