pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::services::common::define_service;

define_service!(DashboardService);

impl DashboardService {
    pub async fn get_summary(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        summary::get_summary(self, request).await
    }
}
