use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::ValidarService;
use crate::services::validar::ValidarQuery;

static VALIDAR_SERVICE: Lazy<ValidarService> = Lazy::new(ValidarService::new_lazy);

pub async fn validate_receipt(
    req: HttpRequest,
    query: web::Query<ValidarQuery>,
) -> ActixResult<HttpResponse> {
    VALIDAR_SERVICE
        .validate_receipt(query.into_inner(), &req)
        .await
}

// 公开页面，二维码扫描入口
pub fn configure_validar_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/validar")
            .wrap(middlewares::RateLimit::validar())
            .route(web::get().to(validate_receipt)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};

    use crate::config::AppConfig;
    use crate::utils::signing::sign_payment_id;

    #[actix_web::test]
    async fn test_tampered_token_is_rejected() {
        let app = test::init_service(App::new().configure(configure_validar_routes)).await;

        // 用 41 号的签名冒充 42 号收据
        let token = sign_payment_id(&AppConfig::get().validation.secret, 41).unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/validar?id=42&token={token}"))
            .peer_addr("10.4.4.4:5000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = test::read_body(resp).await;
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("Recibo no válido"));
    }

    #[actix_web::test]
    async fn test_missing_parameters() {
        let app = test::init_service(App::new().configure(configure_validar_routes)).await;
        let req = test::TestRequest::get()
            .uri("/validar?id=abc")
            .peer_addr("10.4.4.5:5000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
