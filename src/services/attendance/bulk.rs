use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use tracing::info;

use super::AttendanceService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::requests::{AttendanceUpsert, BulkAttendanceRequest},
};
use crate::services::common::{error_response, require_school, try_response};
use crate::services::students::ensure_group;

/// 批量点名：所有学生必须属于该班级，整批在一个事务中写入
pub async fn record_bulk(
    service: &AttendanceService,
    data: BulkAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    if data.records.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "At least one attendance record is required",
        )));
    }

    let storage = service.get_storage(request);
    try_response!(ensure_group(&storage, school_id, Some(data.group_id)).await);

    let members: HashSet<i64> = match storage.list_students_by_group(school_id, data.group_id).await
    {
        Ok(students) => students.into_iter().map(|s| s.id).collect(),
        Err(e) => return Ok(error_response("Failed to load group students", &e)),
    };

    let outsiders: Vec<String> = data
        .records
        .iter()
        .filter(|r| !members.contains(&r.student_id))
        .map(|r| r.student_id.to_string())
        .collect();
    if !outsiders.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            format!(
                "Students not in group {}: {}",
                data.group_id,
                outsiders.join(", ")
            ),
        )));
    }

    let recorded_by = RequireJWT::extract_user_id(request);
    let records: Vec<AttendanceUpsert> = data
        .records
        .into_iter()
        .map(|entry| AttendanceUpsert {
            student_id: entry.student_id,
            group_id: Some(data.group_id),
            date: data.date,
            status: entry.status,
            notes: entry.notes,
            recorded_by,
        })
        .collect();

    match storage.upsert_attendance_bulk(school_id, records).await {
        Ok(saved) => {
            info!(
                "Recorded {} attendance entries for group {} on {}",
                saved.len(),
                data.group_id,
                data.date
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                saved,
                "Attendance recorded successfully",
            )))
        }
        Err(e) => Ok(error_response("Bulk attendance recording failed", &e)),
    }
}
