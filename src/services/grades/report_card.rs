use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::GradeService;
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    attendance::entities::AttendanceSummary,
    grades::{
        entities::{Grade, PeriodScore, ReportCard, SubjectAverage, average},
        requests::ReportCardParams,
    },
    groups::entities::Group,
    students::entities::Student,
    subjects::entities::Subject,
};
use crate::services::common::{error_response, find_student, require_school, try_response};
use crate::storage::Storage;

pub async fn get_report_card(
    service: &GradeService,
    student_id: i64,
    params: ReportCardParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);
    let student = try_response!(find_student(&storage, school_id, student_id).await);

    match build_report_card(&storage, school_id, student, params.period).await {
        Ok(card) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            card,
            "Report card retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to build report card", &e)),
    }
}

/// 读取成绩、科目、班级与考勤并汇总成绩单
pub(crate) async fn build_report_card(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    student: Student,
    period: Option<String>,
) -> Result<ReportCard> {
    let period = period
        .map(|p| p.trim().to_uppercase())
        .filter(|p| !p.is_empty());

    let grades = storage
        .list_student_grades(school_id, student.id, period.as_deref())
        .await?;

    let mut subject_ids: Vec<i64> = grades.iter().map(|g| g.subject_id).collect();
    subject_ids.sort_unstable();
    subject_ids.dedup();
    let subjects = storage.list_subjects_by_ids(school_id, &subject_ids).await?;

    let group = match student.group_id {
        Some(group_id) => storage.get_group_by_id(school_id, group_id).await?,
        None => None,
    };

    let statuses = storage
        .list_student_attendance_statuses(school_id, student.id, None, None)
        .await?;

    Ok(assemble_report_card(
        student,
        group,
        period,
        &grades,
        &subjects,
        AttendanceSummary::from_statuses(statuses),
    ))
}

/// 按科目分组；总平均为各科平均的平均
pub(crate) fn assemble_report_card(
    student: Student,
    group: Option<Group>,
    period: Option<String>,
    grades: &[Grade],
    subjects: &[Subject],
    attendance: AttendanceSummary,
) -> ReportCard {
    let names: HashMap<i64, &str> = subjects.iter().map(|s| (s.id, s.name.as_str())).collect();

    let mut by_subject: BTreeMap<i64, Vec<PeriodScore>> = BTreeMap::new();
    for grade in grades {
        by_subject
            .entry(grade.subject_id)
            .or_default()
            .push(PeriodScore {
                period: grade.period.clone(),
                score: grade.score,
            });
    }

    let mut rows: Vec<SubjectAverage> = by_subject
        .into_iter()
        .map(|(subject_id, mut scores)| {
            scores.sort_by(|a, b| a.period.cmp(&b.period));
            let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
            SubjectAverage {
                subject_id,
                subject_name: names
                    .get(&subject_id)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("#{subject_id}")),
                average: average(&values),
                scores,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.subject_name.cmp(&b.subject_name));

    let subject_averages: Vec<f64> = rows.iter().filter_map(|r| r.average).collect();

    ReportCard {
        student,
        group,
        period,
        overall_average: average(&subject_averages),
        subjects: rows,
        attendance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::EnrollmentStatus;
    use chrono::Utc;

    fn student() -> Student {
        let now = Utc::now();
        Student {
            id: 7,
            school_id: 1,
            enrollment_code: "A-007".into(),
            first_name: "Luis".into(),
            last_name: "Pérez".into(),
            group_id: None,
            guardian_name: None,
            guardian_email: None,
            guardian_phone: None,
            status: EnrollmentStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn grade(subject_id: i64, period: &str, score: f64) -> Grade {
        let now = Utc::now();
        Grade {
            id: 0,
            school_id: 1,
            student_id: 7,
            subject_id,
            period: period.into(),
            score,
            comment: None,
            recorded_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn subject(id: i64, name: &str) -> Subject {
        let now = Utc::now();
        Subject {
            id,
            school_id: 1,
            name: name.into(),
            code: format!("S{id}"),
            group_id: None,
            teacher_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_report_card_groups_by_subject() {
        let grades = vec![
            grade(2, "P2", 9.0),
            grade(1, "P1", 6.0),
            grade(2, "P1", 8.0),
            grade(1, "P2", 7.0),
        ];
        let subjects = vec![subject(1, "Matemáticas"), subject(2, "Español")];
        let card = assemble_report_card(
            student(),
            None,
            None,
            &grades,
            &subjects,
            AttendanceSummary::default(),
        );

        assert_eq!(card.subjects.len(), 2);
        assert_eq!(card.subjects[0].subject_name, "Español");
        assert_eq!(card.subjects[0].scores[0].period, "P1");
        assert_eq!(card.subjects[0].average, Some(8.5));
        assert_eq!(card.subjects[1].average, Some(6.5));
        assert_eq!(card.overall_average, Some(7.5));
    }

    #[test]
    fn test_report_card_without_grades() {
        let card = assemble_report_card(
            student(),
            None,
            Some("P1".into()),
            &[],
            &[],
            AttendanceSummary::default(),
        );
        assert!(card.subjects.is_empty());
        assert!(card.overall_average.is_none());
    }
}
