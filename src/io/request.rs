// src/io/request.rs

//! Turning loosely typed client values into engine inputs.
//!
//! The transport layer hands over whatever JSON it received; these helpers
//! decide what counts as a role and as an order quantity before anything
//! reaches the engine.

use serde_json::Value;

use crate::model::role::Role;
use crate::simulation::error::SubmitError;

/// Reads an integer from a JSON number or a numeric string.
///
/// Floats are accepted only when they have no fractional part.
pub fn integer_like(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Parses a submitted order quantity.
///
/// Missing, non-numeric and fractional values are `InvalidQuantity`; the
/// range check happens in [`crate::simulation::engine::Game::submit`].
pub fn parse_order(value: Option<&Value>) -> Result<i64, SubmitError> {
    let value = value.ok_or_else(|| SubmitError::InvalidQuantity("missing".into()))?;
    integer_like(value).ok_or_else(|| SubmitError::InvalidQuantity(value.to_string()))
}

pub fn parse_role(name: &str) -> Result<Role, SubmitError> {
    Ok(name.parse::<Role>()?)
}
