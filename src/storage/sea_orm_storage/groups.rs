//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::groups::{ActiveModel, Column, Entity as Groups};
use crate::errors::{AcademiqError, Result};
use crate::models::{
    PaginatedResponse,
    groups::{
        entities::Group,
        requests::{CreateGroupRequest, GroupListQuery, UpdateGroupRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_group_impl(&self, school_id: i64, req: CreateGroupRequest) -> Result<Group> {
        let now = chrono::Utc::now().timestamp();

        let result = ActiveModel {
            school_id: Set(school_id),
            name: Set(req.name),
            grade_level: Set(req.grade_level),
            cycle: Set(req.cycle),
            tutor_id: Set(req.tutor_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademiqError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_group())
    }

    pub async fn get_group_by_id_impl(&self, school_id: i64, id: i64) -> Result<Option<Group>> {
        let result = Groups::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_group()))
    }

    pub async fn list_groups_with_pagination_impl(
        &self,
        school_id: i64,
        query: GroupListQuery,
    ) -> Result<PaginatedResponse<Group>> {
        let mut select = Groups::find().filter(Column::SchoolId.eq(school_id));

        if let Some(ref cycle) = query.cycle {
            select = select.filter(Column::Cycle.eq(cycle.as_str()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.contains(escape_like_pattern(search.trim())));
        }

        select = select
            .order_by_desc(Column::Cycle)
            .order_by_asc(Column::GradeLevel)
            .order_by_asc(Column::Name);

        self.paginate(select, query.page, query.size, "班级", |m| m.into_group())
            .await
    }

    pub async fn update_group_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateGroupRequest,
    ) -> Result<Option<Group>> {
        if self.get_group_by_id_impl(school_id, id).await?.is_none() {
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
        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(grade_level);
        }
        if let Some(cycle) = update.cycle {
            model.cycle = Set(cycle);
        }
        if let Some(tutor_id) = update.tutor_id {
            model.tutor_id = Set(Some(tutor_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("更新班级失败: {e}")))?;

        self.get_group_by_id_impl(school_id, id).await
    }

    pub async fn delete_group_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Groups::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
