//! 考勤存储操作

use super::SeaOrmStorage;
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance, Model};
use crate::entity::format_date_column;
use crate::errors::{AcademiqError, Result};
use crate::models::{
    PaginatedResponse,
    attendance::{
        entities::{AttendanceRecord, AttendanceStatus},
        requests::{AttendanceListQuery, AttendanceUpsert, UpdateAttendanceRequest},
    },
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

/// 写入一条考勤，(学生, 日期) 已存在时覆盖
async fn upsert_one<C: ConnectionTrait>(
    conn: &C,
    school_id: i64,
    record: AttendanceUpsert,
) -> Result<Model> {
    let now = chrono::Utc::now().timestamp();
    let date = format_date_column(record.date);

    let existing = Attendance::find()
        .filter(Column::SchoolId.eq(school_id))
        .filter(Column::StudentId.eq(record.student_id))
        .filter(Column::Date.eq(date.as_str()))
        .one(conn)
        .await
        .map_err(|e| AcademiqError::database_operation(format!("查询考勤失败: {e}")))?;

    match existing {
        Some(existing) => ActiveModel {
            id: Set(existing.id),
            group_id: Set(record.group_id.or(existing.group_id)),
            status: Set(record.status.to_string()),
            notes: Set(record.notes),
            recorded_by: Set(record.recorded_by),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(conn)
        .await
        .map_err(|e| AcademiqError::database_operation(format!("更新考勤失败: {e}"))),
        None => ActiveModel {
            school_id: Set(school_id),
            student_id: Set(record.student_id),
            group_id: Set(record.group_id),
            date: Set(date),
            status: Set(record.status.to_string()),
            notes: Set(record.notes),
            recorded_by: Set(record.recorded_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| AcademiqError::database_operation(format!("创建考勤失败: {e}"))),
    }
}

impl SeaOrmStorage {
    pub async fn upsert_attendance_impl(
        &self,
        school_id: i64,
        record: AttendanceUpsert,
    ) -> Result<AttendanceRecord> {
        let model = upsert_one(&self.db, school_id, record).await?;
        Ok(model.into_attendance())
    }

    /// 批量点名，任何一条失败则整体回滚
    pub async fn upsert_attendance_bulk_impl(
        &self,
        school_id: i64,
        records: Vec<AttendanceUpsert>,
    ) -> Result<Vec<AttendanceRecord>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("开启事务失败: {e}")))?;

        let mut saved = Vec::with_capacity(records.len());
        for record in records {
            saved.push(upsert_one(&txn, school_id, record).await?.into_attendance());
        }

        txn.commit()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved)
    }

    pub async fn get_attendance_by_id_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<AttendanceRecord>> {
        let result = Attendance::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(result.map(|m| m.into_attendance()))
    }

    pub async fn list_attendance_with_pagination_impl(
        &self,
        school_id: i64,
        query: AttendanceListQuery,
    ) -> Result<PaginatedResponse<AttendanceRecord>> {
        let mut select = Attendance::find().filter(Column::SchoolId.eq(school_id));

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(group_id) = query.group_id {
            select = select.filter(Column::GroupId.eq(group_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        // 日期以 YYYY-MM-DD 存储，字符串比较即日期比较
        if let Some(from) = query.date_from {
            select = select.filter(Column::Date.gte(format_date_column(from)));
        }
        if let Some(to) = query.date_to {
            select = select.filter(Column::Date.lte(format_date_column(to)));
        }

        select = select
            .order_by_desc(Column::Date)
            .order_by_asc(Column::StudentId);

        self.paginate(select, query.page, query.size, "考勤", |m| {
            m.into_attendance()
        })
        .await
    }

    pub async fn list_student_attendance_statuses_impl(
        &self,
        school_id: i64,
        student_id: i64,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceStatus>> {
        let mut select = Attendance::find()
            .select_only()
            .column(Column::Status)
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::StudentId.eq(student_id));

        if let Some(from) = date_from {
            select = select.filter(Column::Date.gte(format_date_column(from)));
        }
        if let Some(to) = date_to {
            select = select.filter(Column::Date.lte(format_date_column(to)));
        }

        let statuses: Vec<String> = select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询考勤统计失败: {e}")))?;

        Ok(statuses
            .iter()
            .filter_map(|s| s.parse::<AttendanceStatus>().ok())
            .collect())
    }

    pub async fn update_attendance_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<AttendanceRecord>> {
        if self.get_attendance_by_id_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(notes) = update.notes {
            model.notes = Set(Some(notes));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("更新考勤失败: {e}")))?;

        self.get_attendance_by_id_impl(school_id, id).await
    }

    pub async fn delete_attendance_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Attendance::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("删除考勤失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 某天的考勤状态（仪表盘出勤率）
    pub(crate) async fn list_attendance_statuses_on(
        &self,
        school_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceStatus>> {
        let rows = Attendance::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Date.eq(format_date_column(date)))
            .all(&self.db)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询当日考勤失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|m| m.status.parse::<AttendanceStatus>().ok())
            .collect())
    }
}
