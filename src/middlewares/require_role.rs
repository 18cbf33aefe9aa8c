/*!
 * 角色授权中间件
 *
 * 读取 RequireJWT 放入请求扩展的用户，角色不在允许列表内时返回 403。
 * 每个业务模块按读写区分允许的角色组合，见 `UserRole::*_roles()`。
 *
 * ```rust,ignore
 * web::resource("/{id}")
 *     .route(web::get().to(get_student).wrap(RequireRole::new_any(UserRole::staff_roles())))
 *     .route(web::put().to(update_student).wrap(RequireRole::new_any(UserRole::admin_roles())))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    /// 允许列表中的任一角色
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    fn permits(allowed: &[UserRole], role: &UserRole) -> bool {
        allowed.contains(role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let allowed = self.allowed.clone();

        Box::pin(async move {
            // 只取需要的字段，避免长时间持有扩展的借用
            let caller = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role.clone()));

            let Some((user_id, role)) = caller else {
                info!("Role check on {} without an authenticated user", req.path());
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if RequireRole::permits(&allowed, &role) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            info!(
                "Role {} of user {} may not access {} {}",
                role,
                user_id,
                req.method(),
                req.path()
            );
            Ok(req.into_response(
                create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    "Your role is not allowed to perform this operation",
                )
                .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;
    use actix_web::{App, HttpResponse, test, web};

    fn user_with_role(role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id: 9,
            school_id: Some(1),
            username: "caja".to_string(),
            email: "caja@colegio.mx".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[actix_web::test]
    async fn test_role_groups() {
        let finance: Vec<UserRole> = UserRole::finance_roles()
            .iter()
            .map(|r| (*r).clone())
            .collect();
        assert!(RequireRole::permits(&finance, &UserRole::Cashier));
        assert!(RequireRole::permits(&finance, &UserRole::Admin));
        assert!(!RequireRole::permits(&finance, &UserRole::Teacher));
        assert!(!RequireRole::permits(&finance, &UserRole::SuperAdmin));
    }

    #[actix_web::test]
    async fn test_teacher_cannot_reach_finance_routes() {
        let app = test::init_service(
            App::new().service(
                web::resource("/pagos")
                    .route(web::get().to(|| async { HttpResponse::Ok().finish() }))
                    .wrap(RequireRole::new_any(UserRole::finance_roles()))
                    .wrap_fn(|req, srv| {
                        let header = req.headers().get("x-test-role");
                        let role = match header.and_then(|v| v.to_str().ok()) {
                            Some("teacher") => Some(UserRole::Teacher),
                            Some("cashier") => Some(UserRole::Cashier),
                            _ => None,
                        };
                        if let Some(role) = role {
                            req.extensions_mut().insert(user_with_role(role));
                        }
                        srv.call(req)
                    }),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/pagos")
            .insert_header(("x-test-role", "cashier"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/pagos")
            .insert_header(("x-test-role", "teacher"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::get().uri("/pagos").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
