//! Configuration error type.
//!
//! Every check here runs at construction time.  Once a simulation is built
//! there are no fatal conditions: `Sim::tick` always produces a next tick.

use thiserror::Error;

/// Construction-time validation failures shared by all `sw-*` crates.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name:  &'static str,
        value: f64,
        min:   f64,
        max:   f64,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("world bounds are degenerate: min {min} is not strictly below max {max}")]
    DegenerateBounds { min: String, max: String },

    #[error("{what} at {at} lies outside the world bounds")]
    OutsideBounds { what: &'static str, at: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `sw-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;

/// Reject zero, negative, NaN and infinite values.
pub fn ensure_positive(name: &'static str, value: f64) -> CoreResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::NonPositive { name, value })
    }
}

/// Reject NaN and infinite values (zero and negatives are fine).
pub fn ensure_finite(name: &'static str, value: f64) -> CoreResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::NonFinite { name, value })
    }
}

/// Reject values outside the closed interval `[min, max]` (and NaN).
pub fn ensure_in_range(name: &'static str, value: f64, min: f64, max: f64) -> CoreResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::OutOfRange { name, value, min, max })
    }
}
