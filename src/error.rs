use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the attendance core
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// User-correctable input error, message is already localised
    #[error("{0}")]
    #[diagnostic(code(dot_attendance::validation))]
    Validation(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(dot_attendance::not_found))]
    NotFound(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(dot_attendance::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(dot_attendance::config))]
    Config(String),

    #[error("Check-in error: {0}")]
    #[diagnostic(code(dot_attendance::check_in))]
    CheckIn(String),

    #[error(transparent)]
    #[diagnostic(code(dot_attendance::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(dot_attendance::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(dot_attendance::other))]
    Other(String),
}

impl Error {
    /// Whether the error is something the user can fix by correcting input
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::CheckIn(_))
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create not-found errors
pub fn not_found_error(message: &str) -> Error {
    Error::NotFound(message.to_string())
}

/// Helper to create check-in errors
pub fn check_in_error(message: &str) -> Error {
    Error::CheckIn(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
