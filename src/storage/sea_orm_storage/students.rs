//! 学生存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{AcademiqError, Result};
use crate::models::{
    PaginatedResponse,
    common::EnrollmentStatus,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_student_impl(
        &self,
        school_id: i64,
        req: CreateStudentRequest,
    ) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(school_id),
            enrollment_code: Set(req.enrollment_code),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            group_id: Set(req.group_id),
            guardian_name: Set(req.guardian_name),
            guardian_email: Set(req.guardian_email),
            guardian_phone: Set(req.guardian_phone),
            status: Set(EnrollmentStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, school_id: i64, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn list_students_with_pagination_impl(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        let mut select = Students::find().filter(Column::SchoolId.eq(school_id));

        if let Some(group_id) = query.group_id {
            select = select.filter(Column::GroupId.eq(group_id));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped))
                    .add(Column::EnrollmentCode.contains(&escaped)),
            );
        }

        select = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName);

        self.paginate(select, query.page, query.size, "学生", |m| {
            m.into_student()
        })
        .await
    }

    pub async fn list_students_by_group_impl(
        &self,
        school_id: i64,
        group_id: i64,
    ) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::GroupId.eq(group_id))
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .all(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn update_student_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(code) = update.enrollment_code {
            model.enrollment_code = Set(code);
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(group_id) = update.group_id {
            model.group_id = Set(Some(group_id));
        }
        if let Some(name) = update.guardian_name {
            model.guardian_name = Set(Some(name));
        }
        if let Some(email) = update.guardian_email {
            model.guardian_email = Set(Some(email));
        }
        if let Some(phone) = update.guardian_phone {
            model.guardian_phone = Set(Some(phone));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("更新学生失败: {e}")))?;

        self.get_student_by_id_impl(school_id, id).await
    }

    pub async fn delete_student_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Students::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
