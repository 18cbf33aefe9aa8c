//! 公开的收据校验页（/validar?id&token）

pub mod page;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Deserialize;

use crate::services::common::define_service;

define_service!(ValidarService);

/// 参数保持为字符串，缺失或格式错误时同样渲染页面
#[derive(Debug, Default, Deserialize)]
pub struct ValidarQuery {
    pub id: Option<String>,
    pub token: Option<String>,
}

impl ValidarService {
    pub async fn validate_receipt(
        &self,
        query: ValidarQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        page::validate_receipt(self, query, request).await
    }
}
