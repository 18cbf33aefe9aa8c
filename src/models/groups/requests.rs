use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct GroupListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub cycle: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct CreateGroupRequest {
    pub name: String,
    pub grade_level: String,
    pub cycle: String,
    pub tutor_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub grade_level: Option<String>,
    pub cycle: Option<String>,
    pub tutor_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupListQuery {
    pub page: i64,
    pub size: i64,
    pub cycle: Option<String>,
    pub search: Option<String>,
}
