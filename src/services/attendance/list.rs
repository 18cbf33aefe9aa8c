use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::{
    ApiResponse,
    attendance::requests::{AttendanceListParams, AttendanceListQuery},
};
use crate::services::common::{error_response, require_school, try_response};

pub async fn list_attendance(
    service: &AttendanceService,
    query: AttendanceListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let list_query = AttendanceListQuery {
        page: query.pagination.page,
        size: query.pagination.size,
        student_id: query.student_id,
        group_id: query.group_id,
        status: query.status,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    match storage
        .list_attendance_with_pagination(school_id, list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Attendance list retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve attendance list", &e)),
    }
}
