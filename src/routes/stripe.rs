use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::payments::requests::CreateIntentRequest;
use crate::models::users::entities::UserRole;
use crate::services::StripeService;
use crate::utils::SafeIDI64;

static STRIPE_SERVICE: Lazy<StripeService> = Lazy::new(StripeService::new_lazy);

pub async fn create_intent(
    req: HttpRequest,
    data: web::Json<CreateIntentRequest>,
) -> ActixResult<HttpResponse> {
    STRIPE_SERVICE.create_intent(data.into_inner(), &req).await
}

pub async fn confirm_payment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STRIPE_SERVICE.confirm_payment(id.0, &req).await
}

// 签名校验需要原始请求体
pub async fn handle_webhook(req: HttpRequest, body: web::Bytes) -> ActixResult<HttpResponse> {
    STRIPE_SERVICE.handle_webhook(&body, &req).await
}

pub fn configure_stripe_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/stripe")
            .service(
                web::resource("/webhook")
                    .wrap(middlewares::RateLimit::webhook())
                    .route(web::post().to(handle_webhook)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles()))
                    .wrap(middlewares::RequireJWT)
                    .route("/intents", web::post().to(create_intent))
                    .route("/payments/{id}/confirm", web::post().to(confirm_payment)),
            ),
    );
}
