pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::concepts::requests::{
    ConceptListParams, CreateConceptRequest, UpdateConceptRequest,
};
use crate::services::common::define_service;

define_service!(
    /// 缴费项目
    ConceptService
);

impl ConceptService {
    pub async fn list_concepts(
        &self,
        query: ConceptListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_concepts(self, query, request).await
    }

    pub async fn create_concept(
        &self,
        data: CreateConceptRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_concept(self, data, request).await
    }

    pub async fn get_concept(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_concept(self, id, request).await
    }

    pub async fn update_concept(
        &self,
        id: i64,
        data: UpdateConceptRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_concept(self, id, data, request).await
    }

    pub async fn delete_concept(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_concept(self, id, request).await
    }
}
