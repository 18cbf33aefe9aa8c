use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::ai::requests::{AssistantRequest, RiskParams};
use crate::models::users::entities::UserRole;
use crate::services::AiService;
use crate::utils::SafeStudentIdI64;

static AI_SERVICE: Lazy<AiService> = Lazy::new(AiService::new_lazy);

pub async fn assistant(
    req: HttpRequest,
    data: web::Json<AssistantRequest>,
) -> ActixResult<HttpResponse> {
    AI_SERVICE.assistant(data.into_inner(), &req).await
}

pub async fn recommendations(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    AI_SERVICE.recommendations(student_id.0, &req).await
}

pub async fn risk(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<RiskParams>,
) -> ActixResult<HttpResponse> {
    AI_SERVICE
        .risk(student_id.0, query.into_inner(), &req)
        .await
}

// 限流按用户计数，需放在 JWT 之内
pub fn configure_ai_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/ai")
            .wrap(middlewares::RateLimit::ai())
            .wrap(middlewares::RequireRole::new_any(UserRole::academic_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/assistant", web::post().to(assistant))
            .route(
                "/recommendations/{student_id}",
                web::post().to(recommendations),
            )
            .route("/risk/{student_id}", web::get().to(risk)),
    );
}
