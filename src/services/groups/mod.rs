pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::groups::requests::{CreateGroupRequest, GroupListParams, UpdateGroupRequest};
use crate::services::common::define_service;

define_service!(GroupService);

impl GroupService {
    pub async fn list_groups(
        &self,
        query: GroupListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_groups(self, query, request).await
    }

    pub async fn create_group(
        &self,
        data: CreateGroupRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_group(self, data, request).await
    }

    pub async fn get_group(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_group(self, id, request).await
    }

    pub async fn update_group(
        &self,
        id: i64,
        data: UpdateGroupRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_group(self, id, data, request).await
    }

    pub async fn delete_group(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_group(self, id, request).await
    }

    // 班级内的学生
    pub async fn list_group_students(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::list_group_students(self, id, request).await
    }
}
