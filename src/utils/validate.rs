use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid slug regex"));

const CLABE_WEIGHTS: [u32; 3] = [3, 7, 1];

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 3 <= 长度 <= 32
    if username.len() < 3 || username.len() > 32 {
        return Err("Username length must be between 3 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, dots, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), &'static str> {
    if slug.is_empty() || slug.len() > 64 {
        return Err("Slug length must be between 1 and 64 characters");
    }
    if !SLUG_RE.is_match(slug) {
        return Err("Slug must be lowercase words separated by hyphens");
    }
    Ok(())
}

/// CLABE：18 位数字，最后一位为校验位
///
/// 前 17 位依次乘以 3、7、1 的循环权重，各积取个位求和，
/// 校验位 = (10 - 和 % 10) % 10。
pub fn validate_clabe(clabe: &str) -> Result<(), &'static str> {
    if clabe.len() != 18 || !clabe.chars().all(|c| c.is_ascii_digit()) {
        return Err("CLABE must be exactly 18 digits");
    }
    let digits: Vec<u32> = clabe.chars().filter_map(|c| c.to_digit(10)).collect();
    let sum: u32 = digits[..17]
        .iter()
        .enumerate()
        .map(|(i, d)| (d * CLABE_WEIGHTS[i % 3]) % 10)
        .sum();
    let control = (10 - sum % 10) % 10;
    if control != digits[17] {
        return Err("CLABE control digit does not match");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 密码策略：至少 8 位，包含大写、小写字母和数字，且不是常见弱密码
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    let weak_passwords = [
        "password1",
        "Password1",
        "Qwerty123",
        "Abcd1234",
        "Escuela123",
        "Colegio123",
        "Admin1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("Secret123!").is_valid);
    }

    #[test]
    fn test_password_rules() {
        let result = validate_password("abc");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
        assert!(
            validate_password("Colegio123")
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_username_and_email() {
        assert!(validate_username("maria.lopez").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("con espacio").is_err());
        assert!(validate_email("caja@colegio.mx").is_ok());
        assert!(validate_email("sin-arroba").is_err());
    }

    #[test]
    fn test_slug() {
        assert!(validate_slug("colegio-prueba").is_ok());
        assert!(validate_slug("Colegio Prueba").is_err());
        assert!(validate_slug("-inicio").is_err());
    }

    #[test]
    fn test_clabe_control_digit() {
        // 002010077777777771：前 17 位加权和为 69，校验位 1
        assert!(validate_clabe("002010077777777771").is_ok());
        assert_eq!(
            validate_clabe("002010077777777772"),
            Err("CLABE control digit does not match")
        );
        assert!(validate_clabe("12345").is_err());
        assert!(validate_clabe("00201007777777777A").is_err());
    }
}
