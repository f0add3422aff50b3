//! Math types for OpticBench

use crate::error::DomainError;

pub use glam::{DVec2, DVec3};

/// Absolute tolerance used when deciding whether a vector is "zero".
const NEAR_ZERO: f64 = 1e-8;

/// Returns `v / |v|`.
///
/// Fails with [`DomainError::ZeroLengthVector`] when `v` has zero (or non-finite) length,
/// instead of silently producing NaNs.
pub fn normalize(v: DVec3) -> Result<DVec3, DomainError> {
    let length = v.length();
    if length == 0.0 || !length.is_finite() {
        return Err(DomainError::ZeroLengthVector);
    }
    Ok(v / length)
}

/// Reflects `v` about the plane whose unit normal is `normal`.
///
/// `normal` must already be unit length.
pub fn reflect(v: DVec3, normal: DVec3) -> DVec3 {
    v - 2.0 * v.dot(normal) * normal
}

pub fn is_near_zero(v: DVec3) -> bool {
    v.abs().max_element() <= NEAR_ZERO
}
