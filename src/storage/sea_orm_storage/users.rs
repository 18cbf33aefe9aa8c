//! 账号存储操作
//!
//! 账号表同时存放平台管理员（`school_id` 为空）和各校人员，
//! 学校范围的校验在服务层完成。

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{AcademiqError, Result};
use crate::models::{
    PaginatedResponse,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

fn db_error(action: &'static str) -> impl Fn(DbErr) -> AcademiqError {
    move |e| AcademiqError::database_operation(format!("{action}账号失败: {e}"))
}

/// 只写入请求里出现的字段
fn apply_update(model: &mut ActiveModel, update: UpdateUserRequest) {
    if let Some(email) = update.email {
        model.email = Set(email);
    }
    // 此时已是哈希值
    if let Some(password_hash) = update.password {
        model.password_hash = Set(password_hash);
    }
    if let Some(role) = update.role {
        model.role = Set(role.to_string());
    }
    if let Some(status) = update.status {
        model.status = Set(status.to_string());
    }
    if let Some(display_name) = update.display_name {
        model.display_name = Set(Some(display_name));
    }
}

impl SeaOrmStorage {
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let created = ActiveModel {
            school_id: Set(req.school_id),
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error("创建"))?;

        Ok(created.into_user())
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        Ok(Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询"))?
            .map(|m| m.into_user()))
    }

    /// 登录时用户名与邮箱都可以
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let matches = Condition::any()
            .add(Column::Username.eq(identifier))
            .add(Column::Email.eq(identifier));

        Ok(Users::find()
            .filter(matches)
            .one(&self.db)
            .await
            .map_err(db_error("查询"))?
            .map(|m| m.into_user()))
    }

    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>> {
        let mut filter = Condition::all();
        if let Some(school_id) = query.school_id {
            filter = filter.add(Column::SchoolId.eq(school_id));
        }
        if let Some(role) = &query.role {
            filter = filter.add(Column::Role.eq(role.to_string()));
        }
        if let Some(status) = &query.status {
            filter = filter.add(Column::Status.eq(status.to_string()));
        }
        if let Some(search) = query.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            let pattern = escape_like_pattern(search);
            filter = filter.add(
                Condition::any()
                    .add(Column::Username.contains(&pattern))
                    .add(Column::Email.contains(&pattern))
                    .add(Column::DisplayName.contains(&pattern)),
            );
        }

        let select = Users::find()
            .filter(filter)
            .order_by_asc(Column::Username);
        self.paginate(select, query.page, query.size, "账号", |m| m.into_user())
            .await
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let touched = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error("记录登录时间"))?;

        Ok(touched.rows_affected > 0)
    }

    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let Some(existing) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        apply_update(&mut model, update);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let saved = model.update(&self.db).await.map_err(db_error("更新"))?;
        Ok(Some(saved.into_user()))
    }

    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let removed = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除"))?;

        Ok(removed.rows_affected > 0)
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(db_error("统计"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::seeded;
    use crate::models::users::{
        entities::{UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    };

    fn cashier(school_id: i64) -> CreateUserRequest {
        CreateUserRequest {
            username: "caja01".to_string(),
            email: "caja01@colegio.mx".to_string(),
            password: "hash".to_string(),
            role: UserRole::Cashier,
            display_name: Some("Caja matutina".to_string()),
            school_id: Some(school_id),
        }
    }

    #[tokio::test]
    async fn test_login_lookup_by_username_or_email() {
        let db = seeded().await;
        let created = db.storage.create_user_impl(cashier(db.school.id)).await.unwrap();

        let by_name = db.storage.get_user_by_username_or_email_impl("caja01").await.unwrap();
        let by_mail = db
            .storage
            .get_user_by_username_or_email_impl("caja01@colegio.mx")
            .await
            .unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(created.id));
        assert_eq!(by_mail.map(|u| u.id), Some(created.id));
        assert!(
            db.storage
                .get_user_by_username_or_email_impl("nadie")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let db = seeded().await;
        let created = db.storage.create_user_impl(cashier(db.school.id)).await.unwrap();

        let update = UpdateUserRequest {
            email: None,
            password: None,
            role: None,
            status: Some(UserStatus::Suspended),
            display_name: None,
        };
        let updated = db
            .storage
            .update_user_impl(created.id, update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, UserStatus::Suspended);
        assert_eq!(updated.email, "caja01@colegio.mx");
        assert_eq!(updated.role, UserRole::Cashier);

        let missing = UpdateUserRequest {
            email: Some("x@y.mx".to_string()),
            password: None,
            role: None,
            status: None,
            display_name: None,
        };
        assert!(db.storage.update_user_impl(9999, missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_school_and_role() {
        let db = seeded().await;
        db.storage.create_user_impl(cashier(db.school.id)).await.unwrap();

        let query = UserListQuery {
            page: 1,
            size: 20,
            school_id: Some(db.school.id),
            role: Some(UserRole::Cashier),
            ..Default::default()
        };
        let page = db.storage.list_users_with_pagination_impl(query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username, "caja01");

        let other_school = UserListQuery {
            page: 1,
            size: 20,
            school_id: Some(db.school.id + 1),
            ..Default::default()
        };
        let page = db
            .storage
            .list_users_with_pagination_impl(other_school)
            .await
            .unwrap();
        assert!(page.items.is_empty());
    }
}
