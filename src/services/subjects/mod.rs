pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest,
};
use crate::services::common::define_service;
use crate::services::students::ensure_group;
use crate::services::teachers::ensure_teacher;
use crate::storage::Storage;

define_service!(SubjectService);

impl SubjectService {
    pub async fn list_subjects(
        &self,
        query: SubjectListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_subjects(self, query, request).await
    }

    pub async fn create_subject(
        &self,
        data: CreateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_subject(self, data, request).await
    }

    pub async fn get_subject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_subject(self, id, request).await
    }

    pub async fn update_subject(
        &self,
        id: i64,
        data: UpdateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_subject(self, id, data, request).await
    }

    pub async fn delete_subject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_subject(self, id, request).await
    }
}

async fn ensure_refs(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    group_id: Option<i64>,
    teacher_id: Option<i64>,
) -> Result<(), HttpResponse> {
    ensure_group(storage, school_id, group_id).await?;
    ensure_teacher(storage, school_id, teacher_id).await
}
