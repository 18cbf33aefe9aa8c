use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
    RiskLevel {
        Low => "bajo",
        Medium => "medio",
        High => "alto",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct AssistantResponse {
    pub answer: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct RecommendationResponse {
    pub student_id: i64,
    pub recommendations: String,
    pub model: String,
}

// 单个风险因素
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct RiskFactor {
    pub name: String,
    pub detail: String,
    pub points: i32,
}

// 学业风险评估
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct RiskAssessment {
    pub student_id: i64,
    pub score: i32,
    pub level: RiskLevel,
    pub factors: Vec<RiskFactor>,
    pub average_grade: Option<f64>,
    pub attendance_rate: Option<f64>,
    pub failing_subjects: i64,
    pub conduct_observations: i64,
    pub ai_analysis: Option<String>,
}
