//! 请求字段校验

use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,32}$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

/// 班级名称、作业标题等短文本的最大长度（按字符计）
pub const MAX_TITLE_CHARS: usize = 200;

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 3 到 32 位字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err(
            "Username must be 3-32 characters of letters, numbers, underscores or hyphens",
        );
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码至少 8 位，且同时包含字母和数字
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic())
        || !password.chars().any(|c| c.is_ascii_digit())
    {
        return Err("Password must contain both letters and digits");
    }
    Ok(())
}

/// 必填短文本：去掉首尾空白后非空，且不超过 MAX_TITLE_CHARS
pub fn validate_title(field: &'static str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(format!(
            "{field} must be at most {MAX_TITLE_CHARS} characters"
        ));
    }
    Ok(())
}

/// 必填长文本
pub fn validate_required_text(field: &'static str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

/// 作业总分必须为正的有限数
pub fn validate_total_points(total_points: f64) -> Result<(), &'static str> {
    if !total_points.is_finite() || total_points <= 0.0 {
        return Err("Total points must be a positive number");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username() {
        assert!(validate_username("teacher_01").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("ms.frizzle@school.edu").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_password() {
        assert!(validate_password("abcd1234").is_ok());
        assert_eq!(
            validate_password("a1"),
            Err("Password must be at least 8 characters long")
        );
        assert_eq!(
            validate_password("abcdefgh"),
            Err("Password must contain both letters and digits")
        );
    }

    #[test]
    fn test_title() {
        assert!(validate_title("Title", "Essay 1").is_ok());
        assert_eq!(
            validate_title("Title", "   "),
            Err("Title is required".to_string())
        );
        assert!(validate_title("Title", &"x".repeat(MAX_TITLE_CHARS + 1)).is_err());
    }

    #[test]
    fn test_total_points() {
        assert!(validate_total_points(100.0).is_ok());
        assert!(validate_total_points(0.0).is_err());
        assert!(validate_total_points(-5.0).is_err());
        assert!(validate_total_points(f64::NAN).is_err());
    }
}
