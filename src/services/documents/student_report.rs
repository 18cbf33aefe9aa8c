use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DocumentService;
use super::generate::{DocumentTarget, write_document};
use crate::errors::AcademiqError;
use crate::models::{ApiResponse, documents::requests::StudentReportRequest};
use crate::services::common::{error_response, find_student, require_school, try_response};
use crate::services::grades::report_card::build_report_card;
use crate::utils::pdf::render_report_card;

/// 成绩单 PDF：informe-{学生}-{评价期|all}.pdf
pub async fn student_report(
    service: &DocumentService,
    student_id: i64,
    data: StudentReportRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let student = try_response!(find_student(&storage, school_id, student_id).await);
    let school_name = match storage.get_school_by_id(school_id).await {
        Ok(Some(school)) => school.name,
        Ok(None) => {
            return Ok(error_response(
                "Report generation failed",
                &AcademiqError::not_found(format!("School {school_id}")),
            ));
        }
        Err(e) => return Ok(error_response("Failed to load school", &e)),
    };

    let period = data
        .period
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    let card = match build_report_card(&storage, school_id, student, period).await {
        Ok(card) => card,
        Err(e) => return Ok(error_response("Failed to build report card", &e)),
    };

    let suffix = card
        .period
        .as_deref()
        .map(file_safe)
        .unwrap_or_else(|| "all".to_string());
    let document_id = format!("{student_id}-{suffix}");
    let target = DocumentTarget::report(document_id.clone(), format!("informe-{document_id}.pdf"));

    match write_document(&storage, school_id, target, move |path| {
        render_report_card(&school_name, &card, path)
    })
    .await
    {
        Ok(document) => Ok(HttpResponse::Created().json(ApiResponse::success(
            document,
            "Student report generated successfully",
        ))),
        Err(e) => Ok(error_response("Report generation failed", &e)),
    }
}

// 评价期名称用于文件名，只保留字母数字
fn file_safe(period: &str) -> String {
    period
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::file_safe;

    #[test]
    fn test_file_safe_period() {
        assert_eq!(file_safe("P1"), "P1");
        assert_eq!(file_safe("2025/1 A"), "2025_1_A");
        assert_eq!(file_safe("../x"), "___x");
    }
}
