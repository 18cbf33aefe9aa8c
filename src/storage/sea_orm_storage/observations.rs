//! 观察记录存储操作

use super::SeaOrmStorage;
use crate::entity::observations::{ActiveModel, Column, Entity as Observations};
use crate::errors::{AcademiqError, Result};
use crate::models::{
    PaginatedResponse,
    observations::{
        entities::{Observation, ObservationCategory},
        requests::{CreateObservationRequest, ObservationListQuery},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_observation_impl(
        &self,
        school_id: i64,
        author_id: Option<i64>,
        req: CreateObservationRequest,
    ) -> Result<Observation> {
        let result = ActiveModel {
            school_id: Set(school_id),
            student_id: Set(req.student_id),
            author_id: Set(author_id),
            category: Set(req.category.to_string()),
            content: Set(req.content),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademiqError::database_operation(format!("创建观察记录失败: {e}")))?;

        Ok(result.into_observation())
    }

    pub async fn get_observation_by_id_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<Observation>> {
        let result = Observations::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询观察记录失败: {e}")))?;

        Ok(result.map(|m| m.into_observation()))
    }

    pub async fn list_observations_with_pagination_impl(
        &self,
        school_id: i64,
        query: ObservationListQuery,
    ) -> Result<PaginatedResponse<Observation>> {
        let mut select = Observations::find().filter(Column::SchoolId.eq(school_id));

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(category) = query.category {
            select = select.filter(Column::Category.eq(category.as_str()));
        }

        select = select.order_by_desc(Column::CreatedAt);

        self.paginate(select, query.page, query.size, "观察记录", |m| {
            m.into_observation()
        })
        .await
    }

    pub async fn list_recent_observations_impl(
        &self,
        school_id: i64,
        student_id: i64,
        limit: u64,
    ) -> Result<Vec<Observation>> {
        let rows = Observations::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询观察记录失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_observation()).collect())
    }

    pub async fn count_observations_impl(
        &self,
        school_id: i64,
        student_id: i64,
        category: Option<ObservationCategory>,
    ) -> Result<i64> {
        let mut select = Observations::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::StudentId.eq(student_id));

        if let Some(category) = category {
            select = select.filter(Column::Category.eq(category.as_str()));
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("统计观察记录失败: {e}")))?;

        Ok(count as i64)
    }

    pub async fn delete_observation_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Observations::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("删除观察记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
