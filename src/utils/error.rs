use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
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

    #[error("{message}")]
    SignatureError { message: String },

    #[error("Payment provider error ({status}): {message}")]
    ProviderError { status: u16, message: String },

    #[error("Data store error ({status}): {message}")]
    StoreError { status: u16, message: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Project limit of {limit} reached")]
    QuotaExceeded { limit: u32 },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BillingError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BillingError::NotFound { .. } | BillingError::QuotaExceeded { .. } => {
                ErrorSeverity::Low
            }
            BillingError::HttpError(_)
            | BillingError::ProviderError { .. }
            | BillingError::StoreError { .. } => ErrorSeverity::Medium,
            BillingError::SignatureError { .. }
            | BillingError::SerializationError(_)
            | BillingError::ValidationError { .. } => ErrorSeverity::High,
            BillingError::IoError(_)
            | BillingError::ConfigError { .. }
            | BillingError::MissingConfigError { .. }
            | BillingError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BillingError::MissingConfigError { field } => {
                format!("設定缺少 {}，請設定對應的環境變數", field)
            }
            BillingError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定 {} 無效: {}", field, reason)
            }
            BillingError::HttpError(_) => "無法連線到外部服務，請稍後再試".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;
