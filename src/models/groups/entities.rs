use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级/分组
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct Group {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub grade_level: String,
    /// 学年，例如 2025-2026
    pub cycle: String,
    pub tutor_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
