//! SPEI 转账参考号：生成、对账、人工确认、取消与过期

pub mod cancel;
pub mod expire;
pub mod generate;
pub mod get;
pub mod list;
pub mod reconcile;
pub mod verify;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info};

use crate::models::{
    ApiResponse, ErrorCode,
    spei::{
        entities::{SpeiReference, SpeiSettlement},
        requests::{
            GenerateReferenceRequest, ReconcileRequest, SpeiListParams, SpeiSettlementInput,
            VerifyReferenceRequest,
        },
    },
};
use crate::services::common::{define_service, error_response};
use crate::services::documents::generate::issue_receipt;
use crate::storage::Storage;

define_service!(SpeiService);

impl SpeiService {
    pub async fn generate_reference(
        &self,
        data: GenerateReferenceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_reference(self, data, request).await
    }

    pub async fn list_references(
        &self,
        query: SpeiListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_references(self, query, request).await
    }

    pub async fn get_reference(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_reference(self, id, request).await
    }

    pub async fn get_reference_by_code(
        &self,
        reference: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_reference_by_code(self, reference, request).await
    }

    // 银行回单自动对账
    pub async fn reconcile(
        &self,
        data: ReconcileRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        reconcile::reconcile(self, data, request).await
    }

    // 人工确认
    pub async fn verify_reference(
        &self,
        id: i64,
        data: VerifyReferenceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        verify::verify_reference(self, id, data, request).await
    }

    pub async fn cancel_reference(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        cancel::cancel_reference(self, id, request).await
    }

    pub async fn expire_references(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        expire::expire_references(self, request).await
    }
}

pub(crate) async fn find_reference(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    id: i64,
) -> Result<SpeiReference, HttpResponse> {
    match storage.get_spei_reference_by_id(school_id, id).await {
        Ok(Some(reference)) => Ok(reference),
        Ok(None) => Err(reference_not_found(&id.to_string())),
        Err(e) => Err(error_response("Failed to load SPEI reference", &e)),
    }
}

pub(crate) fn reference_not_found(reference: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SpeiReferenceNotFound,
        format!("SPEI reference {reference} not found"),
    ))
}

pub(crate) fn reference_not_pending(reference: &SpeiReference) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::SpeiReferenceNotPending,
        format!(
            "SPEI reference {} is {}, not pending",
            reference.reference, reference.status
        ),
    ))
}

/// 结算参考号并生成收据；收据失败不影响结算结果
pub(crate) async fn settle(
    storage: &Arc<dyn Storage>,
    input: SpeiSettlementInput,
) -> Result<SpeiSettlement, HttpResponse> {
    let final_status = input.final_status;
    let (reference, payment) = match storage.settle_spei_reference(input).await {
        Ok(settled) => settled,
        Err(e) => return Err(error_response("SPEI settlement failed", &e)),
    };

    info!(
        "SPEI reference {} {} -> payment {} ({})",
        reference.reference, final_status, payment.id, payment.amount
    );

    let receipt_url = match issue_receipt(storage, &payment).await {
        Ok(receipt) => Some(receipt.receipt_url),
        Err(e) => {
            error!("Failed to issue receipt for payment {}: {}", payment.id, e);
            None
        }
    };

    Ok(SpeiSettlement {
        reference,
        payment,
        receipt_url,
    })
}
