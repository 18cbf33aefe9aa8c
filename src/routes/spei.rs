use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::spei::requests::{
    GenerateReferenceRequest, ReconcileRequest, SpeiListParams, VerifyReferenceRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::SpeiService;
use crate::utils::SafeIDI64;

static SPEI_SERVICE: Lazy<SpeiService> = Lazy::new(SpeiService::new_lazy);

pub async fn generate_reference(
    req: HttpRequest,
    data: web::Json<GenerateReferenceRequest>,
) -> ActixResult<HttpResponse> {
    SPEI_SERVICE
        .generate_reference(data.into_inner(), &req)
        .await
}

pub async fn list_references(
    req: HttpRequest,
    query: web::Query<SpeiListParams>,
) -> ActixResult<HttpResponse> {
    SPEI_SERVICE.list_references(query.into_inner(), &req).await
}

pub async fn get_reference(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SPEI_SERVICE.get_reference(id.0, &req).await
}

pub async fn get_reference_by_code(
    req: HttpRequest,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    SPEI_SERVICE
        .get_reference_by_code(path.into_inner(), &req)
        .await
}

pub async fn reconcile(
    req: HttpRequest,
    data: web::Json<ReconcileRequest>,
) -> ActixResult<HttpResponse> {
    SPEI_SERVICE.reconcile(data.into_inner(), &req).await
}

pub async fn verify_reference(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<VerifyReferenceRequest>,
) -> ActixResult<HttpResponse> {
    SPEI_SERVICE
        .verify_reference(id.0, data.into_inner(), &req)
        .await
}

pub async fn cancel_reference(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SPEI_SERVICE.cancel_reference(id.0, &req).await
}

pub async fn expire_references(req: HttpRequest) -> ActixResult<HttpResponse> {
    SPEI_SERVICE.expire_references(&req).await
}

pub fn configure_spei_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/spei")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles()))
                    .route("/reconcile", web::post().to(reconcile))
                    .route("/expire", web::post().to(expire_references))
                    .route(
                        "/references/by-reference/{reference}",
                        web::get().to(get_reference_by_code),
                    )
                    .route("/references", web::get().to(list_references))
                    .route("/references", web::post().to(generate_reference))
                    .route("/references/{id}", web::get().to(get_reference))
                    .route("/references/{id}/verify", web::post().to(verify_reference))
                    .route("/references/{id}/cancel", web::post().to(cancel_reference)),
            ),
    );
}
