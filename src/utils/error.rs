use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalystError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

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

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Not found: {resource}")]
    NotFoundError { resource: String },

    #[error("Backend error ({status}): {message}")]
    BackendError { status: u16, message: String },

    #[error("LLM provider error ({status}): {message}")]
    UpstreamError { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, CatalystError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CatalystError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// Re-labels a field check that failed on request data as an input error.
    pub fn into_input(self) -> Self {
        match self {
            Self::MissingConfigError { field } => Self::ValidationError {
                message: format!("Missing required field: {}", field),
            },
            Self::InvalidConfigValueError { field, reason, .. } => Self::ValidationError {
                message: format!("{}: {}", field, reason),
            },
            Self::ConfigValidationError { field, message } => Self::ValidationError {
                message: format!("{}: {}", field, message),
            },
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::BackendError { .. } | Self::UpstreamError { .. } => {
                ErrorCategory::Network
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } | Self::NotFoundError { .. } => ErrorCategory::Input,
            Self::CsvError(_) | Self::SerializationError(_) => ErrorCategory::Data,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. } | Self::NotFoundError { .. } => ErrorSeverity::Low,
            Self::ApiError(_) | Self::UpstreamError { .. } => ErrorSeverity::Medium,
            Self::BackendError { .. } | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorSeverity::High
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. }
            | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Whether the failure came from a remote service rather than the caller.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::ApiError(_) | Self::BackendError { .. } | Self::UpstreamError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) => "Check network connectivity and that the remote endpoint is reachable",
            Self::UpstreamError { status: 401, .. } => "Check that the LLM API key is valid",
            Self::UpstreamError { status: 429, .. } => "The LLM provider is rate limiting; retry later",
            Self::UpstreamError { .. } => "The LLM provider failed; the built-in fallback can still answer",
            Self::BackendError { status: 401, .. } | Self::BackendError { status: 403, .. } => {
                "Check the backend service key"
            }
            Self::BackendError { .. } => "Check that the backend tables exist and accept the row shape",
            Self::CsvError(_) => "Check the output destination for the CSV export",
            Self::IoError(_) => "Check file paths and permissions",
            Self::SerializationError(_) => "Check that the JSON input matches the expected shape",
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Review the configuration file and command line flags"
            }
            Self::MissingConfigError { .. } => "Set the missing value in catalyst.toml or the environment",
            Self::InvalidConfigValueError { .. } => "Correct the highlighted configuration value",
            Self::ValidationError { .. } => "Correct the request payload and try again",
            Self::NotFoundError { .. } => "Check the ids in the request path",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => format!("Invalid request: {}", message),
            Self::MissingConfigError { field } => format!("Missing setting: {}", field),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting {} is invalid: {}", field, reason)
            }
            Self::UpstreamError { .. } | Self::ApiError(_) => {
                "The AI service is currently unavailable".to_string()
            }
            Self::BackendError { .. } => "Could not save your data, please try again".to_string(),
            other => other.to_string(),
        }
    }
}
