/*!
 * Bearer 令牌认证
 *
 * 通过校验后把 `User` 放进请求扩展，处理程序用 `RequireJWT::extract_*` 读取。
 * 用户按令牌缓存在 `user:{token}` 下，注销时删除。令牌中的学校必须与账号当前所属学校一致，
 * 账号被调到其他学校或停用后旧令牌立即失效（缓存过期之后）。
 *
 * ```rust,ignore
 * web::scope("/api/students")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_students))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, StatusCode},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole, UserStatus};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

use super::create_error_response;

#[derive(Clone)]
pub struct RequireJWT;

pub fn user_cache_key(token: &str) -> String {
    format!("user:{token}")
}

pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(actix_web::http::header::AUTHORIZATION)?;
    let token = value.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[derive(Debug)]
enum AuthFailure {
    MissingToken,
    BadToken,
    UnknownUser,
    Disabled(UserStatus),
    SchoolChanged,
    Misconfigured(&'static str),
}

impl AuthFailure {
    fn reply(&self) -> (StatusCode, ErrorCode, String) {
        let unauthorized = |msg: &str| {
            (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                format!("Unauthorized: {msg}"),
            )
        };
        match self {
            AuthFailure::MissingToken => unauthorized("missing bearer token"),
            AuthFailure::BadToken => unauthorized("invalid or expired token"),
            AuthFailure::UnknownUser => unauthorized("user no longer exists"),
            AuthFailure::Disabled(status) => unauthorized(&format!("account is {status}")),
            AuthFailure::SchoolChanged => unauthorized("token issued for another school"),
            AuthFailure::Misconfigured(what) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                format!("{what} not configured"),
            ),
        }
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AuthFailure> {
    let token = bearer_token(req.request()).ok_or(AuthFailure::MissingToken)?;
    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        debug!("Access token rejected: {}", err);
        AuthFailure::BadToken
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or(AuthFailure::Misconfigured("cache"))?;

    let key = user_cache_key(&token);
    let user = match cache.get_json::<User>(&key).await {
        Some(user) => user,
        None => {
            let storage = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|data| data.get_ref().clone())
                .ok_or(AuthFailure::Misconfigured("storage"))?;
            let user_id = claims.user_id().map_err(|_| AuthFailure::BadToken)?;
            let user = storage
                .get_user_by_id(user_id)
                .await
                .map_err(|err| {
                    error!("Loading user {} failed: {}", user_id, err);
                    AuthFailure::UnknownUser
                })?
                .ok_or(AuthFailure::UnknownUser)?;

            if user.status != UserStatus::Active {
                return Err(AuthFailure::Disabled(user.status));
            }
            cache
                .insert_json(key, &user, AppConfig::get().cache.default_ttl)
                .await;
            user
        }
    };

    if user.school_id != claims.school_id {
        return Err(AuthFailure::SchoolChanged);
    }
    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 预检请求不带令牌
            if req.method() == Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("Authenticated user {} ({})", user.id, user.role);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(failure) => {
                    info!("Rejected {} {}: {:?}", req.method(), req.path(), failure);
                    let (status, code, message) = failure.reply();
                    Ok(req.into_response(
                        create_error_response(status, code, &message).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 以下读取器需在 RequireJWT 之后使用
impl RequireJWT {
    pub fn extract_user_claims(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role.clone())
    }

    /// 平台管理员没有学校
    pub fn extract_school_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().and_then(|user| user.school_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::storage::sea_orm_storage::test_support::seeded;
    use actix_web::{App, HttpResponse, test};

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match RequireJWT::extract_school_id(&req) {
            Some(school_id) => HttpResponse::Ok().body(school_id.to_string()),
            None => HttpResponse::Ok().body("platform"),
        }
    }

    #[actix_web::test]
    async fn test_bearer_token_parsing() {
        let req = test::TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def"));

        let req = test::TestRequest::default()
            .insert_header(("Authorization", "Basic Zm9v"))
            .to_http_request();
        assert!(bearer_token(&req).is_none());

        let req = test::TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert!(bearer_token(&req).is_none());
    }

    #[actix_web::test]
    async fn test_token_must_match_current_school() {
        let db = seeded().await;
        let cache: Arc<dyn ObjectCache> =
            Arc::new(MokaCacheWrapper::with_settings(100, 60));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db.dyn_storage()))
                .app_data(web::Data::new(cache))
                .service(
                    web::scope("/me")
                        .wrap(RequireJWT)
                        .route("", web::get().to(whoami)),
                ),
        )
        .await;

        let role = db.admin.role.to_string();
        let good = JwtUtils::generate_access_token(db.admin.id, &role, db.admin.school_id)
            .unwrap();
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {good}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, db.school.id.to_string());

        let forged = JwtUtils::generate_access_token(db.admin.id, &role, Some(db.school.id + 100))
            .unwrap();
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {forged}")))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let req = test::TestRequest::get().uri("/me").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
