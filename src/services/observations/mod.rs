pub mod create;
pub mod delete;
pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::observations::requests::{CreateObservationRequest, ObservationListParams};
use crate::services::common::define_service;

define_service!(ObservationService);

impl ObservationService {
    pub async fn list_observations(
        &self,
        query: ObservationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_observations(self, query, request).await
    }

    pub async fn create_observation(
        &self,
        data: CreateObservationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_observation(self, data, request).await
    }

    pub async fn get_observation(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_observation(self, id, request).await
    }

    pub async fn delete_observation(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_observation(self, id, request).await
    }
}
