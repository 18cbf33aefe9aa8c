use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/observation.ts")]
    ObservationCategory {
        Academic => "academica",
        Conduct => "conducta",
        Health => "salud",
        General => "general",
    }
}

// 学生观察记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observation.ts")]
pub struct Observation {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub author_id: Option<i64>,
    pub category: ObservationCategory,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
