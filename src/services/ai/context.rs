use std::fmt::Write;
use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    common::round_money,
    debts::entities::Debt,
    grades::entities::ReportCard,
    observations::entities::{Observation, ObservationCategory},
    students::entities::Student,
};
use crate::services::grades::report_card::build_report_card;
use crate::storage::Storage;

const RECENT_OBSERVATIONS: u64 = 5;

/// 学生的学业与财务概况，用于风险评估和提示词
pub(crate) struct StudentContext {
    pub card: ReportCard,
    pub observations: Vec<Observation>,
    pub conduct_observations: i64,
    pub outstanding_debts: Vec<Debt>,
}

impl StudentContext {
    pub async fn load(
        storage: &Arc<dyn Storage>,
        school_id: i64,
        student: Student,
    ) -> Result<Self> {
        let student_id = student.id;
        let card = build_report_card(storage, school_id, student, None).await?;
        let observations = storage
            .list_recent_observations(school_id, student_id, RECENT_OBSERVATIONS)
            .await?;
        let conduct_observations = storage
            .count_observations(school_id, student_id, Some(ObservationCategory::Conduct))
            .await?;
        let outstanding_debts = storage
            .list_student_debts(school_id, student_id)
            .await?
            .into_iter()
            .filter(|d| d.status.is_outstanding())
            .collect();

        Ok(Self {
            card,
            observations,
            conduct_observations,
            outstanding_debts,
        })
    }

    /// 科目平均低于 6 的数量
    pub fn failing_subjects(&self) -> i64 {
        self.card
            .subjects
            .iter()
            .filter(|s| s.average.is_some_and(|avg| avg < 6.0))
            .count() as i64
    }

    /// 提示词中的学生数据块
    pub fn to_prompt_block(&self) -> String {
        let card = &self.card;
        let mut out = String::new();

        let _ = writeln!(out, "Alumno: {}", card.student.full_name());
        let _ = writeln!(out, "Matrícula: {}", card.student.enrollment_code);
        if let Some(group) = &card.group {
            let _ = writeln!(out, "Grupo: {}", group.name);
        }

        let _ = writeln!(out, "Calificaciones por materia:");
        if card.subjects.is_empty() {
            let _ = writeln!(out, "- sin calificaciones registradas");
        }
        for subject in &card.subjects {
            let average = subject
                .average
                .map(|a| format!("{a:.2}"))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(out, "- {}: promedio {}", subject.subject_name, average);
        }
        if let Some(overall) = card.overall_average {
            let _ = writeln!(out, "Promedio general: {overall:.2}");
        }

        match card.attendance.attendance_rate {
            Some(rate) => {
                let _ = writeln!(
                    out,
                    "Asistencia: {rate:.1}% ({} faltas de {} registros)",
                    card.attendance.absent, card.attendance.total
                );
            }
            None => {
                let _ = writeln!(out, "Asistencia: sin registros");
            }
        }

        let _ = writeln!(
            out,
            "Observaciones de conducta: {}",
            self.conduct_observations
        );
        for observation in &self.observations {
            let _ = writeln!(
                out,
                "- [{}] {}",
                observation.category, observation.content
            );
        }

        let pending: f64 = self.outstanding_debts.iter().map(|d| d.amount).sum();
        let _ = writeln!(
            out,
            "Adeudos pendientes: {} (total ${:.2})",
            self.outstanding_debts.len(),
            round_money(pending)
        );

        out
    }
}
