use crate::domain::ParamField;

/// Error returned by the binary entry points.
///
/// Carries the process exit code alongside a user-facing message:
/// - `2` bad input (flags, environment, files)
/// - `4` runtime failures (terminal, rendering)
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors raised by the Bass model engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// A parameter lies outside the domain where the closed form is defined.
    #[error("{field} = {value} violates a domain constraint: {reason}")]
    DomainConstraintViolation {
        field: ParamField,
        value: f64,
        reason: &'static str,
    },

    #[error("historical series is empty")]
    EmptySeries,

    #[error("invalid historical series: {0}")]
    InvalidSeries(String),
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::new(2, err.to_string())
    }
}
