use thiserror::Error;

/// 生成後端（模型載入或推論）失敗
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Failed to load model '{model_id}': {message}")]
    Load { model_id: String, message: String },

    #[error("Generation backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Request to generation backend failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed backend response: {message}")]
    MalformedResponse { message: String },

    #[error("Generation backend returned no generated text")]
    EmptyOutput,

    #[error("Invalid generation input: {message}")]
    InvalidInput { message: String },

    #[error("Generation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("{0}")]
    Runtime(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Backend,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GenerationError {
    /// 逾時與後端暫時性錯誤可手動重試
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::Timeout { .. } | GenerationError::Http(_) => true,
            GenerationError::Backend { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Generation(_) => ErrorCategory::Backend,
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AppError::ValidationError { .. } => ErrorCategory::Input,
            AppError::IoError(_) | AppError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::ValidationError { .. } => ErrorSeverity::Low,
            AppError::Generation(e) if e.is_transient() => ErrorSeverity::Medium,
            AppError::Generation(_) => ErrorSeverity::High,
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorSeverity::High,
            AppError::IoError(_) | AppError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::Generation(e) => format!("Error generating test cases: {}", e),
            AppError::IoError(e) => format!("Could not read or write a file: {}", e),
            AppError::ValidationError { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::Generation(GenerationError::Timeout { .. }) => {
                "Increase --timeout-secs or try a shorter requirement"
            }
            AppError::Generation(GenerationError::Backend { status: 401, .. })
            | AppError::Generation(GenerationError::Backend { status: 403, .. }) => {
                "Check the API token (--api-token or HF_API_TOKEN)"
            }
            AppError::Generation(e) if e.is_transient() => {
                "The backend may still be loading the model; wait a moment and try again"
            }
            AppError::Generation(_) => "Check the endpoint and model id, then try again",
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => {
                "Review the command line flags and the TOML configuration file"
            }
            AppError::ValidationError { .. } => "Please enter a valid user story or requirement",
            AppError::IoError(_) => "Check that the path exists and is writable",
            AppError::SerializationError(_) => "Report this issue with the backend response",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_is_backend_category() {
        let err: AppError = GenerationError::Runtime("OOM".to_string()).into();
        assert_eq!(err.category(), ErrorCategory::Backend);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("OOM"));
    }

    #[test]
    fn test_transient_backend_errors() {
        assert!(GenerationError::Timeout { seconds: 5 }.is_transient());
        assert!(GenerationError::Backend {
            status: 503,
            message: "Model is currently loading".to_string()
        }
        .is_transient());
        assert!(!GenerationError::Backend {
            status: 400,
            message: "bad input".to_string()
        }
        .is_transient());
        assert!(!GenerationError::EmptyOutput.is_transient());
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = AppError::MissingConfigError {
            field: "model.model_id".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_auth_failure_suggests_token() {
        let err: AppError = GenerationError::Backend {
            status: 401,
            message: "Invalid credentials".to_string(),
        }
        .into();
        assert!(err.recovery_suggestion().contains("token"));
    }
}
