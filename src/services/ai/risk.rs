use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::context::StudentContext;
use super::{AiService, SYSTEM_PROMPT, ai_failure, claude_client};
use crate::models::{
    ApiResponse,
    ai::{
        entities::{RiskAssessment, RiskFactor, RiskLevel},
        requests::RiskParams,
    },
};
use crate::services::common::{error_response, find_student, require_school, try_response};

/// 学业风险评估；include_ai 时附带模型给出的分析
pub async fn risk(
    service: &AiService,
    student_id: i64,
    params: RiskParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let student = try_response!(find_student(&storage, school_id, student_id).await);
    let context = match StudentContext::load(&storage, school_id, student).await {
        Ok(context) => context,
        Err(e) => return Ok(error_response("Failed to load student context", &e)),
    };

    let mut assessment = assess_risk(
        student_id,
        context.card.overall_average,
        context.card.attendance.attendance_rate,
        context.failing_subjects(),
        context.conduct_observations,
    );

    if params.include_ai.unwrap_or(false) {
        let client = try_response!(claude_client());
        let factors = assessment
            .factors
            .iter()
            .map(|f| format!("- {} (+{}): {}", f.name, f.points, f.detail))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "<alumno>\n{}</alumno>\n\n\
             Puntaje de riesgo calculado: {} ({}).\nFactores:\n{}\n\n\
             Explica en un párrafo el riesgo académico del alumno y sugiere acciones preventivas.",
            context.to_prompt_block(),
            assessment.score,
            assessment.level,
            if factors.is_empty() { "- ninguno".to_string() } else { factors }
        );
        match client.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(completion) => assessment.ai_analysis = Some(completion.text),
            Err(e) => return Ok(ai_failure(&e)),
        }
    }

    if assessment.level == RiskLevel::High {
        warn!(
            "Student {} at high academic risk (score {})",
            student_id, assessment.score
        );
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        assessment,
        "Risk assessment computed successfully",
    )))
}

/// 确定性的风险评分
///
/// 平均分 <6 / <7 / <8 分别 +40 / +25 / +10；出勤率 <80% / <90% 分别 +30 / +15；
/// 不及格科目与行为观察各 +5，均以 15 封顶。总分限制在 0..=100，
/// ≥60 为高风险，≥30 为中风险。
pub(crate) fn assess_risk(
    student_id: i64,
    average_grade: Option<f64>,
    attendance_rate: Option<f64>,
    failing_subjects: i64,
    conduct_observations: i64,
) -> RiskAssessment {
    let mut factors = Vec::new();

    if let Some(avg) = average_grade {
        let points = if avg < 6.0 {
            40
        } else if avg < 7.0 {
            25
        } else if avg < 8.0 {
            10
        } else {
            0
        };
        if points > 0 {
            factors.push(RiskFactor {
                name: "promedio".to_string(),
                detail: format!("Promedio general {avg:.2}"),
                points,
            });
        }
    }

    if let Some(rate) = attendance_rate {
        let points = if rate < 80.0 {
            30
        } else if rate < 90.0 {
            15
        } else {
            0
        };
        if points > 0 {
            factors.push(RiskFactor {
                name: "asistencia".to_string(),
                detail: format!("Asistencia {rate:.1}%"),
                points,
            });
        }
    }

    if failing_subjects > 0 {
        factors.push(RiskFactor {
            name: "materias_reprobadas".to_string(),
            detail: format!("{failing_subjects} materias con promedio menor a 6"),
            points: (failing_subjects * 5).min(15) as i32,
        });
    }

    if conduct_observations > 0 {
        factors.push(RiskFactor {
            name: "conducta".to_string(),
            detail: format!("{conduct_observations} observaciones de conducta"),
            points: (conduct_observations * 5).min(15) as i32,
        });
    }

    let score = factors.iter().map(|f| f.points).sum::<i32>().clamp(0, 100);
    let level = if score >= 60 {
        RiskLevel::High
    } else if score >= 30 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    RiskAssessment {
        student_id,
        score,
        level,
        factors,
        average_grade,
        attendance_rate,
        failing_subjects,
        conduct_observations,
        ai_analysis: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_is_low_risk() {
        let risk = assess_risk(1, None, None, 0, 0);
        assert_eq!(risk.score, 0);
        assert_eq!(risk.level, RiskLevel::Low);
        assert!(risk.factors.is_empty());
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(assess_risk(1, Some(5.99), None, 0, 0).score, 40);
        assert_eq!(assess_risk(1, Some(6.0), None, 0, 0).score, 25);
        assert_eq!(assess_risk(1, Some(7.5), None, 0, 0).score, 10);
        assert_eq!(assess_risk(1, Some(8.0), None, 0, 0).score, 0);
    }

    #[test]
    fn test_attendance_thresholds() {
        assert_eq!(assess_risk(1, None, Some(79.9), 0, 0).score, 30);
        assert_eq!(assess_risk(1, None, Some(80.0), 0, 0).score, 15);
        assert_eq!(assess_risk(1, None, Some(90.0), 0, 0).score, 0);
    }

    #[test]
    fn test_counted_factors_are_capped() {
        let risk = assess_risk(1, None, None, 2, 7);
        assert_eq!(risk.score, 10 + 15);
        assert_eq!(risk.level, RiskLevel::Low);
    }

    #[test]
    fn test_levels() {
        // 25 + 15 = 40
        let medium = assess_risk(1, Some(6.5), Some(85.0), 0, 0);
        assert_eq!(medium.level, RiskLevel::Medium);

        // 40 + 30 + 15 + 15 = 100
        let high = assess_risk(1, Some(4.0), Some(50.0), 5, 5);
        assert_eq!(high.score, 100);
        assert_eq!(high.level, RiskLevel::High);
        assert_eq!(high.factors.len(), 4);
    }
}
