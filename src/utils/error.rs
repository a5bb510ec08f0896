use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Invalid {field} = {value}: {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Irradiance data unavailable: {reason}")]
    DataUnavailable { reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, QuoteError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    DataSource,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl QuoteError {
    pub fn validation(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        QuoteError::Validation {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        QuoteError::DataUnavailable {
            reason: reason.into(),
        }
    }

    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, QuoteError::DataUnavailable { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            QuoteError::Validation { .. } => ErrorCategory::Validation,
            QuoteError::DataUnavailable { .. } | QuoteError::Http(_) => ErrorCategory::DataSource,
            QuoteError::ConfigError { .. }
            | QuoteError::ConfigValidationError { .. }
            | QuoteError::InvalidConfigValueError { .. }
            | QuoteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            QuoteError::Io(_) | QuoteError::Serialization(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 可以用預設日照時數繼續計算
            ErrorCategory::DataSource => ErrorSeverity::Medium,
            ErrorCategory::Validation | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            QuoteError::Validation { .. } => {
                "Check the quote inputs: supply a positive usage or bill, a positive tariff and panel wattage"
            }
            QuoteError::DataUnavailable { .. } | QuoteError::Http(_) => {
                "Retry later, or run with --offline to use the configured default sun-hours"
            }
            QuoteError::MissingConfigError { .. } => "Add the missing key to the configuration file",
            QuoteError::ConfigError { .. }
            | QuoteError::ConfigValidationError { .. }
            | QuoteError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and make sure it is valid TOML"
            }
            QuoteError::Io(_) => "Check that the file exists and is readable",
            QuoteError::Serialization(_) => "Report this as a bug together with the inputs used",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            QuoteError::Validation { field, reason, .. } => {
                format!("The quote could not be calculated: {} ({})", reason, field)
            }
            QuoteError::DataUnavailable { .. } | QuoteError::Http(_) => {
                "Solar irradiance data could not be retrieved for this location".to_string()
            }
            QuoteError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            QuoteError::ConfigError { .. }
            | QuoteError::ConfigValidationError { .. }
            | QuoteError::InvalidConfigValueError { .. } => format!("Configuration problem: {}", self),
            QuoteError::Io(_) | QuoteError::Serialization(_) => {
                format!("Unexpected system error: {}", self)
            }
        }
    }
}
