//! Alignment error between two equally sized point sets.

use super::IcpError;
use crate::point::Point;

/// Mean squared Euclidean distance between paired points.
///
/// Returns 0 for two empty sets.
///
/// # Errors
/// * `IcpError::LengthMismatch` - If the two sets differ in length
pub fn try_mean_squared_error(a: &[Point], b: &[Point]) -> Result<f64, IcpError> {
    if a.len() != b.len() {
        return Err(IcpError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Ok(0.0);
    }

    let total: f64 = a.iter().zip(b).map(|(p, q)| (p - q).norm_squared()).sum();
    Ok(total / a.len() as f64)
}

/// Mean squared Euclidean distance, or `f64::INFINITY` when lengths differ.
pub fn mean_squared_error(a: &[Point], b: &[Point]) -> f64 {
    try_mean_squared_error(a, b).unwrap_or_else(|e| {
        log::warn!("mean squared error on mismatched sets: {e}");
        f64::INFINITY
    })
}
