use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::documents::requests::{IncomeReportRequest, StudentReportRequest};
use crate::models::users::entities::UserRole;
use crate::services::DocumentService;
use crate::utils::SafeIDI64;

static DOCUMENT_SERVICE: Lazy<DocumentService> = Lazy::new(DocumentService::new_lazy);

pub async fn verify_document(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (document_type, document_id) = path.into_inner();
    DOCUMENT_SERVICE
        .verify_document(document_type, document_id, &req)
        .await
}

pub async fn student_report(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<StudentReportRequest>,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE
        .student_report(id.0, data.into_inner(), &req)
        .await
}

pub async fn income_report(
    req: HttpRequest,
    data: web::Json<IncomeReportRequest>,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.income_report(data.into_inner(), &req).await
}

pub fn configure_document_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/documents")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{document_type}/{document_id}/verify")
                    .route(web::get().to(verify_document))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            ),
    );
}

pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/reports")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/students/{id}")
                    .route(web::post().to(student_report))
                    .wrap(middlewares::RequireRole::new_any(UserRole::academic_roles())),
            )
            .service(
                web::resource("/income")
                    .route(web::post().to(income_report))
                    .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles())),
            ),
    );
}
