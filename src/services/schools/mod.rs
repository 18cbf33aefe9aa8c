pub mod create;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::schools::requests::{CreateSchoolRequest, SchoolListParams, UpdateSchoolRequest};
use crate::services::common::define_service;

define_service!(
    /// 学校（租户）管理，仅平台管理员
    SchoolService
);

impl SchoolService {
    pub async fn list_schools(
        &self,
        query: SchoolListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_schools(self, query, request).await
    }

    pub async fn create_school(
        &self,
        data: CreateSchoolRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_school(self, data, request).await
    }

    pub async fn get_school(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_school(self, id, request).await
    }

    pub async fn update_school(
        &self,
        id: i64,
        data: UpdateSchoolRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_school(self, id, data, request).await
    }
}
