//! HMAC-SHA256 签名
//!
//! - 收据校验令牌：对十进制付款 ID 签名，二维码中携带
//! - Stripe webhook：`Stripe-Signature: t=...,v1=...`，签名内容为 `"{t}.{body}"`

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{AcademiqError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Stripe 默认允许的时间偏差（秒）
pub const STRIPE_SIGNATURE_TOLERANCE_SECS: i64 = 300;

fn new_mac(secret: &str) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AcademiqError::signature(format!("Invalid HMAC key: {e}")))
}

/// 付款 ID 的校验令牌（小写十六进制）
pub fn sign_payment_id(secret: &str, payment_id: i64) -> Result<String> {
    let mut mac = new_mac(secret)?;
    mac.update(payment_id.to_string().as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// 常量时间比较令牌
pub fn verify_payment_token(secret: &str, payment_id: i64, token: &str) -> bool {
    let Ok(expected) = hex::decode(token.trim()) else {
        return false;
    };
    let Ok(mut mac) = new_mac(secret) else {
        return false;
    };
    mac.update(payment_id.to_string().as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// 收据二维码指向的公开校验地址
pub fn validation_url(public_base_url: &str, payment_id: i64, token: &str) -> String {
    format!(
        "{}/validar?id={}&token={}",
        public_base_url.trim_end_matches('/'),
        payment_id,
        token
    )
}

/// 校验 Stripe webhook 签名，返回签名时间戳
///
/// 头部可以携带多个 `v1`（密钥轮换期间），任一匹配即通过。
pub fn verify_stripe_signature(
    webhook_secret: &str,
    header: &str,
    payload: &[u8],
    now: i64,
    tolerance_secs: i64,
) -> Result<i64> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| AcademiqError::signature("Stripe-Signature header has no timestamp"))?;
    if signatures.is_empty() {
        return Err(AcademiqError::signature(
            "Stripe-Signature header has no v1 signature",
        ));
    }
    if (now - timestamp).abs() > tolerance_secs {
        return Err(AcademiqError::signature(
            "Stripe-Signature timestamp outside tolerance",
        ));
    }

    let matched = signatures.iter().any(|sig| {
        new_mac(webhook_secret)
            .map(|mut mac| {
                mac.update(timestamp.to_string().as_bytes());
                mac.update(b".");
                mac.update(payload);
                mac.verify_slice(sig).is_ok()
            })
            .unwrap_or(false)
    });

    if matched {
        Ok(timestamp)
    } else {
        Err(AcademiqError::signature("Stripe signature mismatch"))
    }
}

#[cfg(test)]
pub(crate) fn stripe_signature_header(webhook_secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = new_mac(webhook_secret).unwrap();
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "validation-secret";

    #[test]
    fn test_payment_token_roundtrip() {
        let token = sign_payment_id(SECRET, 15).unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(verify_payment_token(SECRET, 15, &token));
    }

    #[test]
    fn test_payment_token_rejects_other_id_and_tampering() {
        let token = sign_payment_id(SECRET, 15).unwrap();
        assert!(!verify_payment_token(SECRET, 16, &token));
        assert!(!verify_payment_token("other-secret", 15, &token));

        let mut tampered = token.clone();
        let last = if tampered.ends_with('0') { '1' } else { '0' };
        tampered.pop();
        tampered.push(last);
        assert!(!verify_payment_token(SECRET, 15, &tampered));
        assert!(!verify_payment_token(SECRET, 15, "zz-not-hex"));
    }

    #[test]
    fn test_validation_url() {
        assert_eq!(
            validation_url("https://escuela.mx/", 3, "abc"),
            "https://escuela.mx/validar?id=3&token=abc"
        );
    }

    #[test]
    fn test_stripe_signature() {
        let payload = br#"{"type":"payment_intent.succeeded"}"#;
        let header = stripe_signature_header("whsec_test", 1_700_000_000, payload);

        assert_eq!(
            verify_stripe_signature("whsec_test", &header, payload, 1_700_000_100, 300).unwrap(),
            1_700_000_000
        );
        // 签名过期
        assert!(
            verify_stripe_signature("whsec_test", &header, payload, 1_700_000_400, 300).is_err()
        );
        // 请求体被修改
        assert!(
            verify_stripe_signature("whsec_test", &header, b"{}", 1_700_000_000, 300).is_err()
        );
        assert!(verify_stripe_signature("whsec_test", "v1=abcd", payload, 0, 300).is_err());
    }
}
