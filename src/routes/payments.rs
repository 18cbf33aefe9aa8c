use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::payments::requests::{
    CreatePaymentRequest, PaymentListParams, UpdatePaymentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::PaymentService;
use crate::utils::SafeIDI64;

static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentListParams>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.list_payments(query.into_inner(), &req).await
}

pub async fn create_payment(
    req: HttpRequest,
    data: web::Json<CreatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.create_payment(data.into_inner(), &req).await
}

pub async fn get_payment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.get_payment(id.0, &req).await
}

pub async fn update_payment(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .update_payment(id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_payment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.delete_payment(id.0, &req).await
}

pub async fn regenerate_receipt(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.regenerate_receipt(id.0, &req).await
}

pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/payments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_payments))
                    .route(web::post().to(create_payment))
                    .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles())),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_payment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_payment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles())),
                    )
                    // 删除记录仅限管理员
                    .route(
                        web::delete()
                            .to(delete_payment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/receipt")
                    .route(web::post().to(regenerate_receipt))
                    .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles())),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use std::sync::Arc;

    use crate::cache::ObjectCache;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::seeded;
    use crate::utils::jwt::JwtUtils;

    #[actix_web::test]
    async fn test_counter_payment_is_created() {
        let db = seeded().await;
        let storage: Arc<dyn Storage> = db.dyn_storage();
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 60));
        let token = JwtUtils::generate_access_token(
            db.admin.id,
            UserRole::ADMIN,
            Some(db.school.id),
        )
        .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(cache))
                .configure(configure_payment_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/payments")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(serde_json::json!({
                "student_id": db.student.id,
                "concept_id": db.concept.id,
                "amount": 1500.0,
                "method": "efectivo"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["payment"]["student_id"], db.student.id);
        assert_eq!(body["data"]["payment"]["amount"], 1500.0);
        assert_eq!(body["data"]["payment"]["status"], "pagado");
    }

    #[actix_web::test]
    async fn test_payments_require_token() {
        let db = seeded().await;
        let storage: Arc<dyn Storage> = db.dyn_storage();
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 60));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(cache))
                .configure(configure_payment_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/payments").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
