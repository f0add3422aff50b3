//! Light rays travelling along the bench.

use crate::error::DomainError;
use crate::math::{DVec3, normalize};

/// Length given to rays that are not explicitly extended.
pub const DEFAULT_RAY_LENGTH: f64 = 1000.0;

/// Intensity of a freshly emitted ray.
pub const DEFAULT_INTENSITY: f64 = 1.0;

/// A light ray, represented as a bounded segment.
///
/// Rays are immutable: every interaction with a component produces a new ray
/// through one of the derivation helpers ([`Ray::with_length`], [`Ray::redirected`], ...).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: DVec3,
    /// Always unit length
    direction: DVec3,
    /// Wavelength in nanometres
    wavelength: f64,
    /// Always strictly positive
    length: f64,
    intensity: f64,
}

impl Ray {
    /// Creates a ray with the default length and intensity.
    ///
    /// `direction` is normalized; a zero direction is rejected.
    pub fn new(origin: DVec3, direction: DVec3, wavelength: f64) -> Result<Self, DomainError> {
        Ok(Self {
            origin,
            direction: normalize(direction)?,
            wavelength,
            length: DEFAULT_RAY_LENGTH,
            intensity: DEFAULT_INTENSITY,
        })
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// The far end of the segment.
    pub fn end(&self) -> DVec3 {
        self.point_at(self.length)
    }

    /// Returns the point at distance `t` (can be negative) from the ray's origin.
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Same ray, different length.
    pub fn with_length(self, length: f64) -> Result<Self, DomainError> {
        if !(length > 0.0) || !length.is_finite() {
            return Err(DomainError::NonPositiveLength(length));
        }
        Ok(Self { length, ..self })
    }

    /// Same ray, different intensity. Negative values are clamped to zero.
    pub fn with_intensity(self, intensity: f64) -> Self {
        Self {
            intensity: intensity.max(0.0),
            ..self
        }
    }

    /// A new default-length ray leaving `origin` along `direction`, keeping this
    /// ray's wavelength and intensity.
    pub fn redirected(&self, origin: DVec3, direction: DVec3) -> Result<Self, DomainError> {
        Ok(Self::new(origin, direction, self.wavelength)?.with_intensity(self.intensity))
    }
}
