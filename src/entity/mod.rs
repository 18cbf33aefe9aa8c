//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod attendance;
pub mod debts;
pub mod document_hashes;
pub mod grades;
pub mod groups;
pub mod observations;
pub mod payment_concepts;
pub mod payments;
pub mod schools;
pub mod spei_references;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;

use chrono::{DateTime, NaiveDate, Utc};

/// 日期列的存储格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

pub(crate) fn parse_date_column(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_default()
}

pub(crate) fn format_date_column(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
