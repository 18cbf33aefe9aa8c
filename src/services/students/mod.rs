pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod statement;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    students::requests::{CreateStudentRequest, StudentListParams, UpdateStudentRequest},
};
use crate::services::common::{define_service, error_response};
use crate::storage::Storage;

define_service!(StudentService);

impl StudentService {
    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, query, request).await
    }

    pub async fn create_student(
        &self,
        data: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, data, request).await
    }

    pub async fn get_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_student(self, id, request).await
    }

    pub async fn update_student(
        &self,
        id: i64,
        data: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, id, data, request).await
    }

    pub async fn delete_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_student(self, id, request).await
    }

    // 账户对账单：欠款、付款与余额
    pub async fn get_statement(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        statement::get_statement(self, id, request).await
    }
}

/// 班级必须属于同一学校
pub(crate) async fn ensure_group(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    group_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let Some(group_id) = group_id else {
        return Ok(());
    };
    match storage.get_group_by_id(school_id, group_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GroupNotFound,
            format!("Group {group_id} not found"),
        ))),
        Err(e) => Err(error_response("Failed to load group", &e)),
    }
}
