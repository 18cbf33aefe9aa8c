use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, check_score};
use crate::models::{ApiResponse, ErrorCode, grades::requests::UpdateGradeRequest};
use crate::services::common::{error_response, require_school, try_response};

pub async fn update_grade(
    service: &GradeService,
    id: i64,
    data: UpdateGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    if let Some(score) = data.score {
        try_response!(check_score(score));
    }

    let storage = service.get_storage(request);
    match storage.update_grade(school_id, id, data).await {
        Ok(Some(grade)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(grade, "Grade updated successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(error_response("Grade update failed", &e)),
    }
}
