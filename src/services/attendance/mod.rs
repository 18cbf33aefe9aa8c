pub mod bulk;
pub mod delete;
pub mod get;
pub mod list;
pub mod record;
pub mod summary;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::attendance::requests::{
    AttendanceListParams, AttendanceSummaryParams, BulkAttendanceRequest,
    RecordAttendanceRequest, UpdateAttendanceRequest,
};
use crate::services::common::define_service;

define_service!(AttendanceService);

impl AttendanceService {
    pub async fn list_attendance(
        &self,
        query: AttendanceListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_attendance(self, query, request).await
    }

    pub async fn record_attendance(
        &self,
        data: RecordAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_attendance(self, data, request).await
    }

    // 按班级批量点名
    pub async fn record_bulk(
        &self,
        data: BulkAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        bulk::record_bulk(self, data, request).await
    }

    pub async fn get_attendance(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_attendance(self, id, request).await
    }

    pub async fn update_attendance(
        &self,
        id: i64,
        data: UpdateAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_attendance(self, id, data, request).await
    }

    pub async fn delete_attendance(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_attendance(self, id, request).await
    }

    pub async fn get_summary(
        &self,
        student_id: i64,
        params: AttendanceSummaryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::get_summary(self, student_id, params, request).await
    }
}
