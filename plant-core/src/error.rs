//! Error types for plant configuration.

use thiserror::Error;

/// Result type alias for configuration checks.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors reported when a configuration cannot produce a plant.
///
/// These are raised synchronously by `validate` (and therefore by
/// [`crate::plant::Plant::generate`]); no structure is created.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A parameter is NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    /// A parameter that has to be strictly positive is not.
    #[error("{field} must be > 0 (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    /// A parameter that has to be non-negative is negative.
    #[error("{field} must be >= 0 (got {value})")]
    Negative { field: &'static str, value: f32 },

    /// The branching probability lies outside `0.0..=9.0`.
    #[error("branch_probability must lie in 0..=9 (got {value})")]
    ProbabilityOutOfRange { value: f32 },

    /// The main branch needs at least one point.
    #[error("main branch must contain at least one point")]
    EmptyMainBranch,

    /// The relaxation pass count is zero.
    #[error("relaxation_passes must be >= 1")]
    NoRelaxationPasses,

    /// A component of the altitude-attenuated pull would put a pole in the
    /// decay curve.
    #[error("altitude-attenuated pull component {axis} must be finite and >= 0 (got {value})")]
    InvalidBias { axis: char, value: f32 },
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn ensure_positive(field: &'static str, value: f32) -> ConfigResult<()> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

/// Checks that `value` is finite and not negative.
pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> ConfigResult<()> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}
