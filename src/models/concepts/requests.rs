use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_bool;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/concept.ts")]
pub struct ConceptListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/concept.ts")]
pub struct CreateConceptRequest {
    pub name: String,
    pub description: Option<String>,
    pub default_amount: f64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/concept.ts")]
pub struct UpdateConceptRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub default_amount: Option<f64>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ConceptListQuery {
    pub page: i64,
    pub size: i64,
    pub active: Option<bool>,
    pub search: Option<String>,
}
