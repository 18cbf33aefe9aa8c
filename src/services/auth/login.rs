use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
    users::entities::{User, UserStatus},
};
use crate::services::common::{error_response, try_response};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

// 不区分“账号不存在”和“密码错误”
fn bad_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}

async fn check_credentials(
    storage: &dyn Storage,
    login: &LoginRequest,
) -> Result<User, HttpResponse> {
    let user = match storage
        .get_user_by_username_or_email(login.username.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return Err(bad_credentials()),
        Err(e) => return Err(error_response("Login failed", &e)),
    };

    if !verify_password(&login.password, &user.password_hash) {
        info!("Wrong password for {}", user.username);
        return Err(bad_credentials());
    }

    if user.status != UserStatus::Active {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            format!("Account is {}", user.status),
        )));
    }
    Ok(user)
}

pub async fn handle_login(
    service: &AuthService,
    login: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let user = try_response!(check_credentials(storage.as_ref(), &login).await);

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Could not record last login for {}: {}", user.id, e);
    }

    // “记住我”延长刷新令牌有效期
    let refresh_ttl = login
        .remember_me
        .then(|| chrono::Duration::days(config.jwt.refresh_token_remember_me_expiry));
    let tokens = match user.generate_token_pair(refresh_ttl) {
        Ok(tokens) => tokens,
        Err(e) => {
            error!("Token issuance failed for {}: {}", user.id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to issue token",
                )),
            );
        }
    };

    info!(
        "{} signed in as {} (school {:?})",
        user.username, user.role, user.school_id
    );
    let cookie = JwtUtils::create_refresh_token_cookie(&tokens.refresh_token);
    let body = LoginResponse {
        access_token: tokens.access_token,
        expires_in: config.jwt.access_token_expiry * 60,
        user,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(body, "Login successful")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{
        entities::UserRole,
        requests::{CreateUserRequest, UpdateUserRequest},
    };
    use crate::storage::sea_orm_storage::test_support::{TestDb, seeded};
    use crate::utils::password::hash_password;

    async fn storage_with_teacher(status: Option<UserStatus>) -> TestDb {
        let db = seeded().await;
        let user = db
            .storage
            .create_user_impl(CreateUserRequest {
                username: "profe.ruiz".to_string(),
                email: "ruiz@colegio.mx".to_string(),
                password: hash_password("Pizarron2025").unwrap(),
                role: UserRole::Teacher,
                display_name: None,
                school_id: Some(db.school.id),
            })
            .await
            .unwrap();
        if let Some(status) = status {
            db.storage
                .update_user_impl(
                    user.id,
                    UpdateUserRequest {
                        email: None,
                        password: None,
                        role: None,
                        status: Some(status),
                        display_name: None,
                    },
                )
                .await
                .unwrap();
        }
        db
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            remember_me: false,
        }
    }

    #[tokio::test]
    async fn test_login_by_email_with_correct_password() {
        let db = storage_with_teacher(None).await;
        let user = check_credentials(db.storage.as_ref(), &login(" ruiz@colegio.mx ", "Pizarron2025"))
            .await
            .unwrap();
        assert_eq!(user.username, "profe.ruiz");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_alike() {
        let db = storage_with_teacher(None).await;
        let wrong = check_credentials(db.storage.as_ref(), &login("profe.ruiz", "otra"))
            .await
            .unwrap_err();
        let unknown = check_credentials(db.storage.as_ref(), &login("nadie", "Pizarron2025"))
            .await
            .unwrap_err();
        assert_eq!(wrong.status(), unknown.status());
        assert_eq!(wrong.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_suspended_account_is_forbidden() {
        let db = storage_with_teacher(Some(UserStatus::Suspended)).await;
        let rejected = check_credentials(db.storage.as_ref(), &login("profe.ruiz", "Pizarron2025"))
            .await
            .unwrap_err();
        assert_eq!(rejected.status(), actix_web::http::StatusCode::FORBIDDEN);
    }
}
