/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors that can occur while analyzing or matching colors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error("Invalid color format {input:?}: {reason}")]
    InvalidColorFormat { input: String, reason: String },
    #[error("No usable shades in catalog")]
    EmptyCatalog,
    #[error("Insufficient sample data: {found} valid samples (minimum {required})")]
    InsufficientSampleData { found: usize, required: usize },
    #[error("Scoring cancelled")]
    Cancelled,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MatchError {
    pub(crate) fn invalid_color(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColorFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
