/*!
 * 固定窗口限流中间件
 *
 * 计数键为 `前缀:身份:窗口序号`。已认证请求按用户计数（需放在 RequireJWT 之内），
 * 否则按客户端 IP（`realip_remote_addr`，反向代理需正确设置转发头）。
 * 超限返回 429，并在 `Retry-After` 中给出到下个窗口的秒数。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

// 键自带窗口序号，TTL 只负责回收旧窗口
static COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(15 * 60))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.max(1),
            key_prefix: "default".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5 次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 公开收据校验页：30 次/分钟/IP
    pub fn validar() -> Self {
        Self::new(30, 60).with_prefix("validar")
    }

    /// AI 接口：20 次/分钟/用户
    pub fn ai() -> Self {
        Self::new(20, 60).with_prefix("ai")
    }

    pub fn webhook() -> Self {
        Self::new(120, 60).with_prefix("webhook")
    }
}

fn caller_identity(req: &ServiceRequest) -> String {
    if let Some(user_id) = req.extensions().get::<User>().map(|user| user.id) {
        return format!("user:{user_id}");
    }
    let ip = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string());
    format!("ip:{ip}")
}

/// 当前窗口序号与距离下个窗口的秒数
fn current_window(now_secs: u64, window_secs: u64) -> (u64, u64) {
    let index = now_secs / window_secs;
    let retry_after = window_secs - now_secs % window_secs;
    (index, retry_after)
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let (window, retry_after) = current_window(now, limit.window_secs);
            let key = format!("{}:{}:{}", limit.key_prefix, caller_identity(&req), window);

            let used = COUNTERS.get(&key).await.unwrap_or(0);
            if used >= limit.max_requests {
                warn!(
                    "Rate limit hit on {} for {} ({}/{})",
                    req.path(),
                    key,
                    used,
                    limit.max_requests
                );
                return Ok(req.into_response(too_many_requests(retry_after).map_into_right_body()));
            }
            COUNTERS.insert(key, used + 1).await;

            let mut res = srv.call(req).await?;
            let remaining = limit.max_requests - used - 1;
            if let Ok(value) = HeaderValue::from_str(&remaining.to_string()) {
                res.headers_mut()
                    .insert(HeaderName::from_static("x-ratelimit-remaining"), value);
            }
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        assert_eq!(RateLimit::validar().max_requests, 30);
        assert_eq!(RateLimit::ai().max_requests, 20);
    }

    #[actix_web::test]
    async fn test_blocks_after_limit() {
        let app = test::init_service(
            App::new().service(
                web::scope("/limited")
                    .wrap(RateLimit::new(2, 60).with_prefix("test-block"))
                    .route("", web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        for _ in 0..2 {
            let req = test::TestRequest::get()
                .uri("/limited")
                .peer_addr("10.1.2.3:4000".parse().unwrap())
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), 200);
        }

        let req = test::TestRequest::get()
            .uri("/limited")
            .peer_addr("10.1.2.3:4000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = resp
            .headers()
            .get("Retry-After")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!((1..=60).contains(&retry_after));

        // 其他 IP 不受影响
        let req = test::TestRequest::get()
            .uri("/limited")
            .peer_addr("10.9.9.9:4000".parse().unwrap())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
    }
}
