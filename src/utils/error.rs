use thiserror::Error;

#[derive(Error, Debug)]
pub enum LandingError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Datastore error: {message}")]
    DatastoreError {
        code: Option<String>,
        message: String,
    },

    #[error("Unexpected response ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },

    #[error("Sitemap error: {message}")]
    SitemapError { message: String },
}

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
pub const DUPLICATE_FAILURE: &str = "This email is already on the waitlist.";

/// 錯誤分類，對應 API 的三種終止結果加上配置問題
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Backend,
    Config,
}

impl LandingError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        LandingError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        LandingError::Conflict {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LandingError::ValidationError { .. } => ErrorCategory::Validation,
            LandingError::Conflict { .. } => ErrorCategory::Conflict,
            LandingError::ConfigError { .. }
            | LandingError::MissingConfigError { .. }
            | LandingError::InvalidConfigValueError { .. }
            | LandingError::ConfigValidationError { .. } => ErrorCategory::Config,
            LandingError::HttpError(_)
            | LandingError::IoError(_)
            | LandingError::SerializationError(_)
            | LandingError::DatastoreError { .. }
            | LandingError::UnexpectedResponse { .. }
            | LandingError::SitemapError { .. } => ErrorCategory::Backend,
        }
    }

    /// HTTP 狀態碼
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            ErrorCategory::Conflict => 409,
            ErrorCategory::Backend | ErrorCategory::Config => 500,
        }
    }

    /// 給終端使用者看的訊息，不洩漏後端細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            LandingError::ValidationError { message, .. } => message.clone(),
            LandingError::Conflict { .. } => DUPLICATE_FAILURE.to_string(),
            LandingError::ConfigError { .. }
            | LandingError::MissingConfigError { .. }
            | LandingError::InvalidConfigValueError { .. }
            | LandingError::ConfigValidationError { .. } => {
                format!("Configuration problem: {}", self)
            }
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LandingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_category() {
        assert_eq!(LandingError::validation("email", "bad").status_code(), 400);
        assert_eq!(LandingError::conflict("dup").status_code(), 409);
        let backend = LandingError::DatastoreError {
            code: Some("XX000".to_string()),
            message: "boom".to_string(),
        };
        assert_eq!(backend.status_code(), 500);
        assert_eq!(backend.category(), ErrorCategory::Backend);
    }

    #[test]
    fn test_backend_message_is_generic() {
        let err = LandingError::UnexpectedResponse {
            status: 502,
            message: "upstream connect error".to_string(),
        };
        assert!(!err.user_friendly_message().contains("upstream"));
        assert_eq!(err.user_friendly_message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_conflict_message_is_shared_with_form() {
        let err = LandingError::conflict("Email already registered for waitlist");
        assert_eq!(err.user_friendly_message(), DUPLICATE_FAILURE);
        assert_eq!(
            crate::core::client::DUPLICATE_FAILURE,
            DUPLICATE_FAILURE
        );
    }
}
