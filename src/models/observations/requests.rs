use super::entities::ObservationCategory;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observation.ts")]
pub struct ObservationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    pub category: Option<ObservationCategory>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observation.ts")]
pub struct CreateObservationRequest {
    pub student_id: i64,
    pub category: ObservationCategory,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct ObservationListQuery {
    pub page: i64,
    pub size: i64,
    pub student_id: Option<i64>,
    pub category: Option<ObservationCategory>,
}
