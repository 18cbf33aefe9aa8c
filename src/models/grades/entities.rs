use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::attendance::entities::AttendanceSummary;
use crate::models::groups::entities::Group;
use crate::models::students::entities::Student;

/// 及格线
pub const PASSING_SCORE: f64 = 6.0;
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

// 成绩（学生 + 科目 + 评价期唯一）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub period: String,
    pub score: f64,
    pub comment: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct PeriodScore {
    pub period: String,
    pub score: f64,
}

// 单科汇总
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SubjectAverage {
    pub subject_id: i64,
    pub subject_name: String,
    pub scores: Vec<PeriodScore>,
    pub average: Option<f64>,
}

// 成绩单
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ReportCard {
    pub student: Student,
    pub group: Option<Group>,
    /// 为空表示全部评价期
    pub period: Option<String>,
    pub subjects: Vec<SubjectAverage>,
    pub overall_average: Option<f64>,
    pub attendance: AttendanceSummary,
}

/// 算术平均，空集返回 None，结果保留两位小数
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    Some((avg * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[8.0, 9.0]), Some(8.5));
        assert_eq!(average(&[7.0, 8.0, 8.0]), Some(7.67));
    }
}
