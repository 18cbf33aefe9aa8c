pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod mark_overdue;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    debts::{
        entities::Debt,
        requests::{CreateDebtRequest, DebtListParams, UpdateDebtRequest},
    },
};
use crate::services::common::{define_service, error_response};
use crate::storage::Storage;

define_service!(
    /// 欠款（adeudos）
    DebtService
);

impl DebtService {
    pub async fn list_debts(
        &self,
        query: DebtListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_debts(self, query, request).await
    }

    pub async fn create_debt(
        &self,
        data: CreateDebtRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_debt(self, data, request).await
    }

    pub async fn get_debt(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_debt(self, id, request).await
    }

    pub async fn update_debt(
        &self,
        id: i64,
        data: UpdateDebtRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_debt(self, id, data, request).await
    }

    pub async fn delete_debt(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_debt(self, id, request).await
    }

    // 到期未付的欠款转为逾期
    pub async fn mark_overdue(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mark_overdue::mark_overdue(self, request).await
    }
}

/// 读取本校欠款，不存在时返回 404 响应
pub(crate) async fn find_debt(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    debt_id: i64,
) -> Result<Debt, HttpResponse> {
    match storage.get_debt_by_id(school_id, debt_id).await {
        Ok(Some(debt)) => Ok(debt),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DebtNotFound,
            format!("Debt {debt_id} not found"),
        ))),
        Err(e) => Err(error_response("Failed to load debt", &e)),
    }
}

/// 付款或参考号关联的欠款：必须属于同一学生、同一项目，且尚未支付
pub(crate) async fn find_payable_debt(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    debt_id: i64,
    student_id: i64,
    concept_id: i64,
) -> Result<Debt, HttpResponse> {
    let debt = find_debt(storage, school_id, debt_id).await?;
    if debt.student_id != student_id || debt.concept_id != concept_id {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            format!("Debt {debt_id} does not belong to this student and concept"),
        )));
    }
    if !debt.status.is_outstanding() {
        return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::DebtAlreadyPaid,
            format!("Debt {debt_id} is already paid"),
        )));
    }
    Ok(debt)
}
