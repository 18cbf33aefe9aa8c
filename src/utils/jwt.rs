//! 访问令牌与刷新令牌
//!
//! 两种令牌共用同一个 HS256 密钥，用 `kind` 区分；令牌里带上角色和学校，
//! 刷新时无需查库即可签发新的 access token。

use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const REFRESH_COOKIE: &str = "academiq_refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    /// 平台管理员为空
    pub school_id: Option<i64>,
    pub kind: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| JwtError::from(ErrorKind::InvalidSubject))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn sign(
        user_id: i64,
        role: &str,
        school_id: Option<i64>,
        kind: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String, JwtError> {
        let issued = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            school_id,
            kind,
            exp: (issued + ttl).timestamp() as usize,
            iat: issued.timestamp() as usize,
        };
        let key = EncodingKey::from_secret(AppConfig::get().jwt.secret.as_bytes());
        encode(&Header::default(), &claims, &key)
    }

    pub fn generate_access_token(
        user_id: i64,
        role: &str,
        school_id: Option<i64>,
    ) -> Result<String, JwtError> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::sign(
            user_id,
            role,
            school_id,
            TokenKind::Access,
            chrono::Duration::minutes(minutes),
        )
    }

    /// `refresh_ttl` 为空时使用配置的刷新令牌有效期
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        school_id: Option<i64>,
        refresh_ttl: Option<chrono::Duration>,
    ) -> Result<TokenPair, JwtError> {
        let refresh_ttl = refresh_ttl
            .unwrap_or_else(|| chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry));
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role, school_id)?,
            refresh_token: Self::sign(user_id, role, school_id, TokenKind::Refresh, refresh_ttl)?,
        })
    }

    pub fn verify_token(token: &str) -> Result<Claims, JwtError> {
        let key = DecodingKey::from_secret(AppConfig::get().jwt.secret.as_bytes());
        Ok(decode::<Claims>(token, &key, &Validation::default())?.claims)
    }

    fn verify_kind(token: &str, kind: TokenKind) -> Result<Claims, JwtError> {
        let claims = Self::verify_token(token)?;
        if claims.kind != kind {
            return Err(ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify_kind(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify_kind(token, TokenKind::Refresh)
    }

    pub fn refresh_access_token(refresh_token: &str) -> Result<String, JwtError> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        Self::generate_access_token(claims.user_id()?, &claims.role, claims.school_id)
    }

    fn refresh_cookie(value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, value)
            .path("/api/auth")
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_refresh_token_cookie(refresh_token: &str) -> Cookie<'static> {
        let days = AppConfig::get().jwt.refresh_token_expiry;
        Self::refresh_cookie(refresh_token.to_string(), CookieDuration::days(days))
    }

    /// 注销时覆盖浏览器里的刷新令牌
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::refresh_cookie(String::new(), CookieDuration::ZERO)
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_kinds() {
        let pair = JwtUtils::generate_token_pair(7, "cashier", Some(3), None).unwrap();

        let access = JwtUtils::verify_access_token(&pair.access_token).unwrap();
        assert_eq!(access.user_id().unwrap(), 7);
        assert_eq!(access.role, "cashier");
        assert_eq!(access.school_id, Some(3));
        assert_eq!(access.kind, TokenKind::Access);

        // 刷新令牌不能当 access token 用
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_refresh_keeps_school() {
        let pair = JwtUtils::generate_token_pair(9, "teacher", Some(12), None).unwrap();
        let access = JwtUtils::refresh_access_token(&pair.refresh_token).unwrap();
        let claims = JwtUtils::verify_access_token(&access).unwrap();
        assert_eq!(claims.school_id, Some(12));
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = JwtUtils::generate_access_token(1, "admin", Some(1)).unwrap();
        assert!(JwtUtils::verify_token(&format!("{token}x")).is_err());
    }

    #[test]
    fn test_empty_cookie_expires_immediately() {
        let cookie = JwtUtils::create_empty_refresh_token_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
