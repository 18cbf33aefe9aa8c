use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::debts::requests::{CreateDebtRequest, DebtListParams, UpdateDebtRequest};
use crate::models::users::entities::UserRole;
use crate::services::DebtService;
use crate::utils::SafeIDI64;

static DEBT_SERVICE: Lazy<DebtService> = Lazy::new(DebtService::new_lazy);

pub async fn list_debts(
    req: HttpRequest,
    query: web::Query<DebtListParams>,
) -> ActixResult<HttpResponse> {
    DEBT_SERVICE.list_debts(query.into_inner(), &req).await
}

pub async fn create_debt(
    req: HttpRequest,
    data: web::Json<CreateDebtRequest>,
) -> ActixResult<HttpResponse> {
    DEBT_SERVICE.create_debt(data.into_inner(), &req).await
}

pub async fn get_debt(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    DEBT_SERVICE.get_debt(id.0, &req).await
}

pub async fn update_debt(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateDebtRequest>,
) -> ActixResult<HttpResponse> {
    DEBT_SERVICE.update_debt(id.0, data.into_inner(), &req).await
}

pub async fn delete_debt(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    DEBT_SERVICE.delete_debt(id.0, &req).await
}

pub async fn mark_overdue(req: HttpRequest) -> ActixResult<HttpResponse> {
    DEBT_SERVICE.mark_overdue(&req).await
}

pub fn configure_debt_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/debts")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles()))
                    .route("/mark-overdue", web::post().to(mark_overdue))
                    .route("", web::get().to(list_debts))
                    .route("", web::post().to(create_debt))
                    .route("/{id}", web::get().to(get_debt))
                    .route("/{id}", web::put().to(update_debt))
                    .route("/{id}", web::delete().to(delete_debt)),
            ),
    );
}
