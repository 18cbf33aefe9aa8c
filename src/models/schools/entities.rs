use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学校（租户）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct School {
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// SPEI 收款账户（18 位 CLABE）
    pub clabe: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 创建学校的返回（含首个管理员）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolCreatedResponse {
    pub school: School,
    pub admin: Option<crate::models::users::entities::User>,
}
