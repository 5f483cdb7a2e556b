use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("API Error {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Unexpected API response: {message}")]
    UnexpectedResponse { message: String },

    #[error("No lead data available in this session")]
    NoSessionData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Upstream,
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

impl LeadError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) => ErrorCategory::Network,
            Self::UpstreamError { .. } => ErrorCategory::Upstream,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::UnexpectedResponse { .. }
            | Self::NoSessionData => ErrorCategory::Data,
            Self::IoError(_) => ErrorCategory::System,
            Self::UrlError(_)
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. }
            | Self::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(e) if e.is_timeout() => {
                "The request timed out; check your connection and try again"
            }
            Self::ApiError(_) => "Check your network connection and try again",
            Self::UpstreamError { status: 401 | 403, .. } => {
                "Check that your Apollo API key is valid and has access to this endpoint"
            }
            Self::UpstreamError { .. } => "Review the API response above and adjust the request",
            Self::UrlError(_) => "Paste the full search URL copied from the browser address bar",
            Self::MissingConfigError { .. } => {
                "Provide the missing value on the command line or in the config file"
            }
            Self::InvalidConfigValueError { .. } | Self::ConfigValidationError { .. } => {
                "Fix the configuration value and run again"
            }
            Self::ValidationError { .. } => "Fill in the required inputs and run again",
            Self::NoSessionData => "Fetch leads first, then export or send them",
            Self::CsvError(_) | Self::SerializationError(_) | Self::UnexpectedResponse { .. } => {
                "The API returned data that could not be processed; try a narrower query"
            }
            Self::IoError(_) => "Check that the output path exists and is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(e) => format!("Request failed: {}", e),
            Self::UpstreamError { status, body } => format!("API Error {}: {}", status, body),
            Self::MissingConfigError { field } => format!("Please provide {}.", field),
            Self::ValidationError { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LeadError>;
