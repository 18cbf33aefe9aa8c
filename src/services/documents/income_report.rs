use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, NaiveTime};
use std::collections::{BTreeSet, HashMap};

use super::DocumentService;
use super::generate::{DocumentTarget, write_document};
use crate::models::{
    ApiResponse, ErrorCode,
    documents::{
        entities::{IncomeReport, IncomeReportResponse},
        requests::IncomeReportRequest,
    },
};
use crate::services::common::{error_response, require_school, try_response};
use crate::utils::pdf::render_income_report;

/// 收入报表 PDF：ingresos-{起}-{止}.pdf，两端日期均包含在内
pub async fn income_report(
    service: &DocumentService,
    data: IncomeReportRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if data.date_from > data.date_to {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "date_from must not be after date_to",
        )));
    }

    let storage = service.get_storage(request);
    let school_name = match storage.get_school_by_id(school_id).await {
        Ok(school) => school.map(|s| s.name).unwrap_or_default(),
        Err(e) => return Ok(error_response("Failed to load school", &e)),
    };

    let from = data.date_from.and_time(NaiveTime::MIN).and_utc();
    let to = data.date_to.and_time(NaiveTime::MIN).and_utc() + Duration::days(1)
        - Duration::seconds(1);

    let payments = match storage.list_paid_payments_between(school_id, from, to).await {
        Ok(payments) => payments,
        Err(e) => return Ok(error_response("Failed to load payments", &e)),
    };

    let concept_ids: BTreeSet<i64> = payments.iter().map(|p| p.concept_id).collect();
    let mut concept_names = HashMap::with_capacity(concept_ids.len());
    for concept_id in concept_ids {
        match storage.get_concept_by_id(school_id, concept_id).await {
            Ok(Some(concept)) => {
                concept_names.insert(concept_id, concept.name);
            }
            Ok(None) => {}
            Err(e) => return Ok(error_response("Failed to load payment concepts", &e)),
        }
    }

    let report = IncomeReport::from_payments(data.date_from, data.date_to, &payments, &concept_names);

    let document_id = format!("{}-{}", data.date_from, data.date_to);
    let target = DocumentTarget::report(document_id.clone(), format!("ingresos-{document_id}.pdf"));
    let pdf_report = report.clone();

    match write_document(&storage, school_id, target, move |path| {
        render_income_report(&school_name, &pdf_report, path)
    })
    .await
    {
        Ok(document) => Ok(HttpResponse::Created().json(ApiResponse::success(
            IncomeReportResponse { report, document },
            "Income report generated successfully",
        ))),
        Err(e) => Ok(error_response("Report generation failed", &e)),
    }
}
