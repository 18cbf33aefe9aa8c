use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::{
    ApiResponse,
    grades::requests::{GradeListParams, GradeListQuery},
};
use crate::services::common::{error_response, require_school, try_response};

pub async fn list_grades(
    service: &GradeService,
    query: GradeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let list_query = GradeListQuery {
        page: query.pagination.page,
        size: query.pagination.size,
        student_id: query.student_id,
        subject_id: query.subject_id,
        period: query.period.map(|p| p.trim().to_uppercase()),
    };

    match storage.list_grades_with_pagination(school_id, list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Grade list retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to retrieve grade list", &e)),
    }
}
