pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    teachers::requests::{CreateTeacherRequest, TeacherListParams, UpdateTeacherRequest},
};
use crate::services::common::{define_service, error_response};
use crate::services::users::find_school_user;
use crate::storage::Storage;

define_service!(TeacherService);

impl TeacherService {
    pub async fn list_teachers(
        &self,
        query: TeacherListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_teachers(self, query, request).await
    }

    pub async fn create_teacher(
        &self,
        data: CreateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_teacher(self, data, request).await
    }

    pub async fn get_teacher(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_teacher(self, id, request).await
    }

    pub async fn update_teacher(
        &self,
        id: i64,
        data: UpdateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_teacher(self, id, data, request).await
    }

    pub async fn delete_teacher(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_teacher(self, id, request).await
    }
}

/// 教师必须属于同一学校
pub(crate) async fn ensure_teacher(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    teacher_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let Some(teacher_id) = teacher_id else {
        return Ok(());
    };
    match storage.get_teacher_by_id(school_id, teacher_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            format!("Teacher {teacher_id} not found"),
        ))),
        Err(e) => Err(error_response("Failed to load teacher", &e)),
    }
}

/// 关联的登录账号必须属于同一学校
async fn ensure_linked_user(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    user_id: Option<i64>,
) -> Result<(), HttpResponse> {
    match user_id {
        Some(user_id) => find_school_user(storage, school_id, user_id).await.map(|_| ()),
        None => Ok(()),
    }
}
