//! 成绩存储操作

use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{AcademiqError, Result};
use crate::models::{
    PaginatedResponse,
    grades::{
        entities::Grade,
        requests::{CreateGradeRequest, GradeListQuery, UpdateGradeRequest},
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 录入成绩，(学生, 科目, 评价期) 已存在时覆盖分数与评语
    pub async fn upsert_grade_impl(
        &self,
        school_id: i64,
        recorded_by: Option<i64>,
        req: CreateGradeRequest,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let existing = Grades::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::StudentId.eq(req.student_id))
            .filter(Column::SubjectId.eq(req.subject_id))
            .filter(Column::Period.eq(req.period.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询成绩失败: {e}")))?;

        let result = match existing {
            Some(existing) => ActiveModel {
                id: Set(existing.id),
                score: Set(req.score),
                comment: Set(req.comment),
                recorded_by: Set(recorded_by),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("更新成绩失败: {e}")))?,
            None => ActiveModel {
                school_id: Set(school_id),
                student_id: Set(req.student_id),
                subject_id: Set(req.subject_id),
                period: Set(req.period),
                score: Set(req.score),
                comment: Set(req.comment),
                recorded_by: Set(recorded_by),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("创建成绩失败: {e}")))?,
        };

        Ok(result.into_grade())
    }

    pub async fn get_grade_by_id_impl(&self, school_id: i64, id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    pub async fn list_grades_with_pagination_impl(
        &self,
        school_id: i64,
        query: GradeListQuery,
    ) -> Result<PaginatedResponse<Grade>> {
        let mut select = Grades::find().filter(Column::SchoolId.eq(school_id));

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(ref period) = query.period {
            select = select.filter(Column::Period.eq(period.as_str()));
        }

        select = select.order_by_desc(Column::UpdatedAt);

        self.paginate(select, query.page, query.size, "成绩", |m| m.into_grade())
            .await
    }

    pub async fn list_student_grades_impl(
        &self,
        school_id: i64,
        student_id: i64,
        period: Option<&str>,
    ) -> Result<Vec<Grade>> {
        let mut select = Grades::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::StudentId.eq(student_id));

        if let Some(period) = period {
            select = select.filter(Column::Period.eq(period));
        }

        let grades = select
            .order_by_asc(Column::SubjectId)
            .order_by_asc(Column::Period)
            .all(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询学生成绩失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    pub async fn update_grade_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Option<Grade>> {
        if self.get_grade_by_id_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(score) = update.score {
            model.score = Set(score);
        }
        if let Some(comment) = update.comment {
            model.comment = Set(Some(comment));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("更新成绩失败: {e}")))?;

        self.get_grade_by_id_impl(school_id, id).await
    }

    pub async fn delete_grade_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Grades::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("删除成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
