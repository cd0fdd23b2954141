use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// 啟動階段的錯誤 (設定載入、驗證、綁定埠號)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl AppError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::IoError(e) => format!("File or network operation failed: {}", e),
            AppError::HttpClientError(e) => format!("Could not build the upstream HTTP client: {}", e),
            AppError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            AppError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid value for '{}': {}", value, field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::IoError(_) => "Check that the config file exists and the port is not already in use",
            AppError::HttpClientError(_) => "Check the TLS setup and the upstream user agent value",
            AppError::ConfigValidationError { .. } => "Check the TOML syntax of the config file",
            AppError::InvalidConfigValueError { .. } => "Fix the value in the config file or on the command line",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// 轉發失敗的分類，每一種都對應到固定的回應狀態碼與訊息
#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("upstream responded with {status}")]
    UpstreamStatus { status: StatusCode, reason: String },

    #[error("transport failure while fetching {resource}: {source}")]
    Transport {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid {name} parameter: {value:?}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("unexpected failure: {message}")]
    Unexpected { message: String },
}

impl ForwardError {
    pub fn upstream_status(status: StatusCode) -> Self {
        ForwardError::UpstreamStatus {
            status,
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ForwardError::UpstreamStatus { status, .. } => *status,
            ForwardError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            ForwardError::Transport { .. } | ForwardError::Unexpected { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Body returned to the caller. Transport and unexpected failures never
    /// carry the underlying error detail.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ForwardError::UpstreamStatus { reason, .. } => reason.clone(),
            ForwardError::Transport { resource, .. } => {
                format!("An error occurred while fetching {}.", resource)
            }
            ForwardError::InvalidParameter { name, .. } => {
                format!("The {} parameter must not be blank.", name)
            }
            ForwardError::Unexpected { .. } => "An unexpected error occurred.".to_string(),
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.user_friendly_message(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_uses_reason_phrase() {
        let err = ForwardError::upstream_status(StatusCode::NOT_FOUND);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_friendly_message(), "Not Found");
    }

    #[test]
    fn test_unregistered_status_has_empty_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = ForwardError::upstream_status(status);
        assert_eq!(err.status_code().as_u16(), 599);
        assert_eq!(err.user_friendly_message(), "");
    }

    #[test]
    fn test_unexpected_hides_detail() {
        let err = ForwardError::Unexpected {
            message: "relative URL without a base".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_friendly_message(), "An unexpected error occurred.");
    }

    #[test]
    fn test_invalid_parameter_is_bad_request() {
        let err = ForwardError::InvalidParameter {
            name: "date",
            value: " ".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.user_friendly_message().contains("date"));
    }
}
