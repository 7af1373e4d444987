/// Convenience result type used across vantage.
pub type VantageResult<T> = Result<T, VantageError>;

/// Top-level error taxonomy used by transform APIs.
#[derive(thiserror::Error, Debug)]
pub enum VantageError {
    /// Current parameters make a transform singular (zero scale, singular matrix).
    #[error("non-invertible transform: {0}")]
    NonInvertible(String),

    /// Invalid user-provided parameters (degenerate viewport, bad log base).
    #[error("validation error: {0}")]
    Validation(String),

    /// Shader assembly failed; this is a programmer error surfaced at assembly time.
    #[error("shader assembly error: {0}")]
    Shader(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VantageError {
    /// Build a [`VantageError::NonInvertible`] value.
    pub fn non_invertible(msg: impl Into<String>) -> Self {
        Self::NonInvertible(msg.into())
    }

    /// Build a [`VantageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VantageError::Shader`] value.
    pub fn shader(msg: impl Into<String>) -> Self {
        Self::Shader(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
