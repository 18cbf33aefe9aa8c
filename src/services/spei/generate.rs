use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Duration;
use tracing::info;

use super::SpeiService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse,
    spei::{
        entities::SpeiInstructions,
        requests::{GenerateReferenceRequest, NewSpeiReference},
    },
};
use crate::services::common::{
    error_response, find_concept, find_student, require_positive_amount, require_school,
    try_response,
};
use crate::services::debts::find_payable_debt;
use crate::utils::spei_reference::generate_reference as new_reference_code;

/// 生成待付参考号，返回付款人转账所需的信息
pub async fn generate_reference(
    service: &SpeiService,
    data: GenerateReferenceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);
    let config = AppConfig::get();

    try_response!(find_student(&storage, school_id, data.student_id).await);
    let concept = try_response!(find_concept(&storage, school_id, data.concept_id).await);

    let debt = match data.debt_id {
        Some(debt_id) => Some(try_response!(
            find_payable_debt(&storage, school_id, debt_id, data.student_id, data.concept_id)
                .await
        )),
        None => None,
    };

    let amount = data
        .amount
        .or(debt.as_ref().map(|d| d.amount))
        .unwrap_or(concept.default_amount);
    let amount = try_response!(require_positive_amount(amount));

    let school = match storage.get_school_by_id(school_id).await {
        Ok(Some(school)) => school,
        Ok(None) => {
            return Ok(error_response(
                "Failed to load school",
                &crate::errors::AcademiqError::not_found(format!("School {school_id}")),
            ));
        }
        Err(e) => return Ok(error_response("Failed to load school", &e)),
    };

    let new_reference = NewSpeiReference {
        school_id,
        student_id: data.student_id,
        concept_id: data.concept_id,
        debt_id: data.debt_id,
        reference: new_reference_code(&config.spei.prefix, data.student_id, data.concept_id),
        amount,
        expires_at: chrono::Utc::now() + Duration::days(config.spei.expiration_days),
    };

    match storage.create_spei_reference(new_reference).await {
        Ok(reference) => {
            info!(
                "SPEI reference {} generated for student {} ({})",
                reference.reference, reference.student_id, reference.amount
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SpeiInstructions {
                    reference,
                    beneficiary: school.name,
                    clabe: school.clabe,
                },
                "SPEI reference generated successfully",
            )))
        }
        Err(e) => Ok(error_response("SPEI reference generation failed", &e)),
    }
}
