//! SPEI 参考号
//!
//! 格式：`{PREFIX}-{studentId}-{conceptId}-{SHORT}`，SHORT 为 v4 UUID 前 8 位十六进制（大写）。

use chrono::{DateTime, Utc};

use crate::errors::{AcademiqError, Result};

const SHORT_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference {
    pub prefix: String,
    pub student_id: i64,
    pub concept_id: i64,
    pub short: String,
}

pub fn generate_reference(prefix: &str, student_id: i64, concept_id: i64) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    let short = uuid[..SHORT_LEN].to_uppercase();
    format!("{prefix}-{student_id}-{concept_id}-{short}")
}

pub fn parse_reference(reference: &str) -> Result<ParsedReference> {
    let invalid = || AcademiqError::validation(format!("Malformed SPEI reference: {reference}"));

    // 前缀本身不含 '-'，从右侧切分以容错
    let mut parts = reference.trim().rsplitn(4, '-');
    let short = parts.next().ok_or_else(invalid)?;
    let concept = parts.next().ok_or_else(invalid)?;
    let student = parts.next().ok_or_else(invalid)?;
    let prefix = parts.next().ok_or_else(invalid)?;

    if prefix.is_empty() || prefix.contains('-') {
        return Err(invalid());
    }
    if short.len() != SHORT_LEN || !short.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let student_id = student.parse::<i64>().map_err(|_| invalid())?;
    let concept_id = concept.parse::<i64>().map_err(|_| invalid())?;
    if student_id <= 0 || concept_id <= 0 {
        return Err(invalid());
    }

    Ok(ParsedReference {
        prefix: prefix.to_string(),
        student_id,
        concept_id,
        short: short.to_uppercase(),
    })
}

/// 回单金额与期望金额的差值是否在容差内
pub fn amount_matches(expected: f64, received: f64, tolerance: f64) -> bool {
    (received - expected).abs() <= tolerance
}

/// 参考号是否已过期（严格晚于过期时间）
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > expires_at
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_generate_format() {
        let reference = generate_reference("ACQ", 12, 3);
        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "ACQ");
        assert_eq!(parts[1], "12");
        assert_eq!(parts[2], "3");
        assert_eq!(parts[3].len(), 8);
        assert!(
            parts[3]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_generate_is_random() {
        assert_ne!(generate_reference("ACQ", 1, 1), generate_reference("ACQ", 1, 1));
    }

    #[test]
    fn test_parse_roundtrip() {
        let reference = generate_reference("ACQ", 45, 7);
        let parsed = parse_reference(&reference).unwrap();
        assert_eq!(parsed.prefix, "ACQ");
        assert_eq!(parsed.student_id, 45);
        assert_eq!(parsed.concept_id, 7);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "ACQ",
            "ACQ-1-2",
            "ACQ-x-2-ABCDEF12",
            "ACQ-1-2-ABC",
            "ACQ-1-2-GHIJKLMN",
            "-1-2-ABCDEF12",
            "ACQ-0-2-ABCDEF12",
        ] {
            assert!(parse_reference(bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn test_amount_tolerance() {
        assert!(amount_matches(2500.0, 2500.0, 1.0));
        assert!(amount_matches(2500.0, 2499.0, 1.0));
        assert!(amount_matches(2500.0, 2501.0, 1.0));
        assert!(!amount_matches(2500.0, 2498.5, 1.0));
        assert!(!amount_matches(2500.0, 250.0, 1.0));
    }

    #[test]
    fn test_expiry_boundary() {
        let expires_at = Utc::now();
        assert!(!is_expired(expires_at, expires_at));
        assert!(is_expired(expires_at, expires_at + Duration::seconds(1)));
        assert!(!is_expired(expires_at, expires_at - Duration::days(1)));
    }
}
