use crate::utils::error::{LandingError, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// 與前端表單相同的 email 形狀檢查：local@domain.tld，不含空白
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// GA4 measurement id，例如 `G-ABC123`。會原樣寫進 inline script，所以只接受這個形狀
static MEASUREMENT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^G-[A-Z0-9]+$").expect("measurement id pattern compiles"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn validate_email(field_name: &str, email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(LandingError::validation(field_name, "Invalid email format"))
    }
}

/// 必填文字欄位：None、空字串或只有空白都算缺少
pub fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LandingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LandingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LandingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LandingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LandingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LandingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_measurement_id(field_name: &str, value: &str) -> Result<()> {
    if !MEASUREMENT_ID_PATTERN.is_match(value) {
        return Err(LandingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Measurement id must look like G-XXXXXXXXXX".to_string(),
        });
    }
    Ok(())
}

/// sitemap priority：0.0 到 1.0，最多一位小數（輸出時固定一位）
pub fn validate_priority(field_name: &str, value: f32) -> Result<()> {
    validate_range(field_name, value, 0.0, 1.0)?;
    let scaled = value * 10.0;
    if (scaled.round() - scaled).abs() > 1e-4 {
        return Err(LandingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Priority allows at most one decimal place".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LandingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "jane@clinic.co.uk").is_ok());
        assert!(validate_email("email", "a.b+tag@example.com").is_ok());
        assert!(validate_email("email", "foo@bar").is_err());
        assert!(validate_email("email", "foo bar@example.com").is_err());
        assert!(validate_email("email", "@example.com").is_err());
        assert!(validate_email("email", "foo@@example.com").is_err());
        assert!(validate_email("email", "").is_err());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("   ")));
        assert!(!is_blank(Some("Jane")));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("datastore.url", "https://example.supabase.co").is_ok());
        assert!(validate_url("datastore.url", "http://localhost:54321").is_ok());
        assert!(validate_url("datastore.url", "").is_err());
        assert!(validate_url("datastore.url", "invalid-url").is_err());
        assert!(validate_url("datastore.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_seconds", 10, 1, 120).is_ok());
        assert!(validate_range("timeout_seconds", 0, 1, 120).is_err());
        assert!(validate_range("priority", 1.5, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_measurement_id() {
        assert!(validate_measurement_id("id", "G-ABC123").is_ok());
        assert!(validate_measurement_id("id", "G-XXXXXXXXXX").is_ok());
        assert!(validate_measurement_id("id", "G-x');alert(1)//").is_err());
        assert!(validate_measurement_id("id", "UA-12345").is_err());
        assert!(validate_measurement_id("id", "").is_err());
    }

    #[test]
    fn test_validate_priority() {
        assert!(validate_priority("priority", 0.9).is_ok());
        assert!(validate_priority("priority", 1.0).is_ok());
        assert!(validate_priority("priority", 0.0).is_ok());
        assert!(validate_priority("priority", 0.85).is_err());
        assert!(validate_priority("priority", 1.1).is_err());
    }
}
