pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod report_card;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    grades::{
        entities::{MAX_SCORE, MIN_SCORE},
        requests::{CreateGradeRequest, GradeListParams, ReportCardParams, UpdateGradeRequest},
    },
};
use crate::services::common::define_service;

define_service!(GradeService);

impl GradeService {
    pub async fn list_grades(
        &self,
        query: GradeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_grades(self, query, request).await
    }

    // 录入成绩（同一学生/科目/评价期覆盖）
    pub async fn create_grade(
        &self,
        data: CreateGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_grade(self, data, request).await
    }

    pub async fn get_grade(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_grade(self, id, request).await
    }

    pub async fn update_grade(
        &self,
        id: i64,
        data: UpdateGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_grade(self, id, data, request).await
    }

    pub async fn delete_grade(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_grade(self, id, request).await
    }

    pub async fn get_report_card(
        &self,
        student_id: i64,
        params: ReportCardParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report_card::get_report_card(self, student_id, params, request).await
    }
}

/// 分数范围 0..=10
pub(crate) fn check_score(score: f64) -> Result<(), HttpResponse> {
    if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::GradeOutOfRange,
            format!("Score must be between {MIN_SCORE} and {MAX_SCORE}"),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_range() {
        assert!(check_score(0.0).is_ok());
        assert!(check_score(10.0).is_ok());
        assert!(check_score(7.5).is_ok());
        assert!(check_score(10.1).is_err());
        assert!(check_score(-0.5).is_err());
        assert!(check_score(f64::NAN).is_err());
    }
}
