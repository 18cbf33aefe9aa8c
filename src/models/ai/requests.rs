use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct AssistantRequest {
    pub prompt: String,
    /// 附带该学生的学业上下文
    pub student_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct RiskParams {
    pub include_ai: Option<bool>,
}
