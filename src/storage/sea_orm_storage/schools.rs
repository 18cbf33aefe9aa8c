//! 学校存储操作

use super::SeaOrmStorage;
use crate::entity::schools::{ActiveModel, Column, Entity as Schools};
use crate::entity::users::ActiveModel as UserActiveModel;
use crate::errors::{AcademiqError, Result};
use crate::models::{
    PaginatedResponse,
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest},
    },
    users::{
        entities::{User, UserStatus},
        requests::CreateUserRequest,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建学校（可附带首个管理员）
    pub async fn create_school_impl(
        &self,
        req: CreateSchoolRequest,
        admin: Option<CreateUserRequest>,
    ) -> Result<(School, Option<User>)> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("开启事务失败: {e}")))?;

        let school = ActiveModel {
            name: Set(req.name),
            slug: Set(req.slug),
            clabe: Set(req.clabe),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AcademiqError::database_operation(format!("创建学校失败: {e}")))?;

        let admin = match admin {
            Some(admin) => {
                let user = UserActiveModel {
                    school_id: Set(Some(school.id)),
                    username: Set(admin.username),
                    email: Set(admin.email),
                    password_hash: Set(admin.password),
                    role: Set(admin.role.to_string()),
                    status: Set(UserStatus::Active.to_string()),
                    display_name: Set(admin.display_name),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| {
                    AcademiqError::database_operation(format!("创建学校管理员失败: {e}"))
                })?;
                Some(user.into_user())
            }
            None => None,
        };

        txn.commit()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((school.into_school(), admin))
    }

    pub async fn get_school_by_id_impl(&self, id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    pub async fn list_schools_with_pagination_impl(
        &self,
        query: SchoolListQuery,
    ) -> Result<PaginatedResponse<School>> {
        let mut select = Schools::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Slug.contains(&escaped)),
            );
        }

        select = select.order_by_asc(Column::Name);

        self.paginate(select, query.page, query.size, "学校", |m| m.into_school())
            .await
    }

    pub async fn update_school_impl(
        &self,
        id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        if self.get_school_by_id_impl(id).await?.is_none() {
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

        if let Some(clabe) = update.clabe {
            model.clabe = Set(Some(clabe));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("更新学校失败: {e}")))?;

        self.get_school_by_id_impl(id).await
    }
}
