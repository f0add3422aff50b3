//! Error types for OpticBench

use thiserror::Error;

/// Degenerate geometry encountered while propagating light.
///
/// These are expected conditions: a component that hits one simply does not
/// interact with the ray for that tick.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,

    #[error("ray is parallel to the sensor plane")]
    ParallelToPlane,

    #[error("intersection at t = {t} lies outside the ray range [0, {length}]")]
    OutOfRange { t: f64, length: f64 },

    #[error("intersection at pixel ({x:.2}, {y:.2}) falls outside the sensor")]
    OffSensor { x: f64, y: f64 },

    #[error("sensor basis is degenerate for this orientation")]
    DegenerateBasis,

    #[error("ray length must be positive, got {0}")]
    NonPositiveLength(f64),
}

#[derive(Error, Debug)]
pub enum OpticBenchError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Component error: {0}")]
    Component(String),
}

pub type Result<T> = std::result::Result<T, OpticBenchError>;
