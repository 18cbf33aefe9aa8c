use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{entities::AttendanceSummary, requests::AttendanceSummaryParams},
};
use crate::services::common::{error_response, find_student, require_school, try_response};

pub async fn get_summary(
    service: &AttendanceService,
    student_id: i64,
    params: AttendanceSummaryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if let (Some(from), Some(to)) = (params.date_from, params.date_to)
        && from > to
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "date_from must not be after date_to",
        )));
    }

    let storage = service.get_storage(request);
    try_response!(find_student(&storage, school_id, student_id).await);

    match storage
        .list_student_attendance_statuses(school_id, student_id, params.date_from, params.date_to)
        .await
    {
        Ok(statuses) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttendanceSummary::from_statuses(statuses),
            "Attendance summary retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to build attendance summary", &e)),
    }
}
