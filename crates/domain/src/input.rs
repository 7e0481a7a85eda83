//! Lenient numeric input as sent by browser clients.
//!
//! Numbers may arrive as JSON numbers or as strings (`"42"`, `"-3.7"`).
//! Multipart form fields are always strings.

use serde::Deserialize;

use crate::error::ValidationError;

/// A numeric value that may have been sent as a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// Numeric value, or `None` when the text does not parse as a number.
    ///
    /// Blank text counts as zero.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) => None,
            Self::Text(s) if s.trim().is_empty() => Some(0.0),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Whether the input counts as "not provided": zero or empty text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Text(s) => s.is_empty(),
        }
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for NumberInput {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for NumberInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Drop blank inputs so that callers only see values that were really given.
#[must_use]
pub fn present(input: Option<NumberInput>) -> Option<NumberInput> {
    input.filter(|n| !n.is_blank())
}

/// Interpret a present input as a positive integral identifier.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidId`] naming `field` when the value is
/// not numeric, not integral, or below 1.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn positive_id(input: &NumberInput, field: &'static str) -> Result<i64, ValidationError> {
    match input.value() {
        Some(n) if n >= 1.0 && n.fract() == 0.0 && n <= i64::MAX as f64 => Ok(n as i64),
        _ => Err(ValidationError::InvalidId(field)),
    }
}
