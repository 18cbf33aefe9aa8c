//! 各服务共用的请求上下文与错误映射

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::errors::AcademiqError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, concepts::entities::PaymentConcept, students::entities::Student,
};
use crate::storage::Storage;

/// 生成服务结构体（存储延迟从 app_data 获取）
macro_rules! define_service {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            storage: Option<std::sync::Arc<dyn $crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> std::sync::Arc<dyn $crate::storage::Storage> {
                match &self.storage {
                    Some(storage) => storage.clone(),
                    None => $crate::services::common::storage_from_request(request),
                }
            }
        }
    };
}

pub(crate) use define_service;

pub(crate) fn storage_from_request(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn cache_from_request(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

/// 当前用户所属学校；平台管理员没有学校，不能操作学校内数据
pub(crate) fn require_school(request: &HttpRequest) -> Result<i64, HttpResponse> {
    RequireJWT::extract_school_id(request).ok_or_else(|| {
        HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "This operation requires a school account",
        ))
    })
}

/// 将领域错误转换为 HTTP 响应
pub(crate) fn error_response(context: &str, err: &AcademiqError) -> HttpResponse {
    let message = format!("{context}: {}", err.message());
    match err {
        AcademiqError::NotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, message))
        }
        AcademiqError::Conflict(_) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::Conflict, message))
        }
        AcademiqError::Validation(_) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, message)),
        AcademiqError::PaymentGateway(_) => HttpResponse::BadGateway()
            .json(ApiResponse::error_empty(ErrorCode::StripeGatewayError, message)),
        AcademiqError::AiService(_) => HttpResponse::BadGateway()
            .json(ApiResponse::error_empty(ErrorCode::AiServiceError, message)),
        e if e.is_unique_violation() => HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            format!("{context}: record already exists"),
        )),
        e if e.is_foreign_key_violation() => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                format!("{context}: referenced record does not exist"),
            ),
        ),
        AcademiqError::DocumentGeneration(_) => {
            error!("{}", message);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::DocumentGenerationFailed,
                message,
            ))
        }
        _ => {
            error!("{}", message);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::InternalServerError, message))
        }
    }
}

/// 同一学校内查找学生，不存在时返回 404 响应
pub(crate) async fn find_student(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    student_id: i64,
) -> Result<Student, HttpResponse> {
    match storage.get_student_by_id(school_id, student_id).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            format!("Student {student_id} not found"),
        ))),
        Err(e) => Err(error_response("Failed to load student", &e)),
    }
}

pub(crate) async fn find_concept(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    concept_id: i64,
) -> Result<PaymentConcept, HttpResponse> {
    match storage.get_concept_by_id(school_id, concept_id).await {
        Ok(Some(concept)) => Ok(concept),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ConceptNotFound,
            format!("Payment concept {concept_id} not found"),
        ))),
        Err(e) => Err(error_response("Failed to load payment concept", &e)),
    }
}

/// 金额必须为正数
pub(crate) fn require_positive_amount(amount: f64) -> Result<f64, HttpResponse> {
    if amount.is_finite() && amount > 0.0 {
        Ok(crate::models::common::round_money(amount))
    } else {
        Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Amount must be greater than zero",
        )))
    }
}

/// 提取 Result<T, HttpResponse> 中的值，失败时直接返回响应
macro_rules! try_response {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(response) => return Ok(response),
        }
    };
}

pub(crate) use try_response;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status_mapping() {
        let cases = [
            (AcademiqError::not_found("x"), StatusCode::NOT_FOUND),
            (AcademiqError::conflict("x"), StatusCode::CONFLICT),
            (AcademiqError::validation("x"), StatusCode::BAD_REQUEST),
            (AcademiqError::payment_gateway("x"), StatusCode::BAD_GATEWAY),
            (AcademiqError::ai_service("x"), StatusCode::BAD_GATEWAY),
            (
                AcademiqError::database_operation("UNIQUE constraint failed: students.code"),
                StatusCode::CONFLICT,
            ),
            (
                AcademiqError::database_operation("FOREIGN KEY constraint failed"),
                StatusCode::BAD_REQUEST,
            ),
            (AcademiqError::file_operation("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(error_response("ctx", &err).status(), status, "{err}");
        }
    }

    #[test]
    fn test_positive_amount() {
        assert_eq!(require_positive_amount(10.006).ok(), Some(10.01));
        assert!(require_positive_amount(0.0).is_err());
        assert!(require_positive_amount(f64::NAN).is_err());
    }
}
