use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    attendance::requests::{AttendanceUpsert, RecordAttendanceRequest},
};
use crate::services::common::{error_response, find_student, require_school, try_response};

// 同一学生同一天已有记录时覆盖
pub async fn record_attendance(
    service: &AttendanceService,
    data: RecordAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);
    let student = try_response!(find_student(&storage, school_id, data.student_id).await);

    let record = AttendanceUpsert {
        student_id: student.id,
        group_id: student.group_id,
        date: data.date,
        status: data.status,
        notes: data.notes,
        recorded_by: RequireJWT::extract_user_id(request),
    };

    match storage.upsert_attendance(school_id, record).await {
        Ok(record) => Ok(HttpResponse::Created().json(ApiResponse::success(
            record,
            "Attendance recorded successfully",
        ))),
        Err(e) => Ok(error_response("Attendance recording failed", &e)),
    }
}
