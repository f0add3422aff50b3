use crate::error::{OpticBenchError, Result};
use std::time::Duration;

/// How the light table hands the emitted ray to its components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PropagationMode {
    /// Every component sees the same emitted ray independently; the rays they
    /// return are discarded.
    #[default]
    Broadcast,
    /// The ray is threaded through the components in order, each one consuming the
    /// most recent ray. Propagation stops at the first absorbing component.
    Chained,
}

/// Configuration descriptor for a light table
#[derive(Debug, Clone)]
pub struct LightTableDesc {
    /// Extent of the bench `(width, height)`, in bench units
    pub bench_size: (f64, f64),
    /// The emitted ray is stretched to this multiple of the laser-to-camera distance
    pub ray_extension_factor: f64,
    pub propagation: PropagationMode,
    /// Interval the external driver is expected to tick at
    pub tick_interval: Duration,
}

impl Default for LightTableDesc {
    fn default() -> Self {
        Self {
            bench_size: (1000.0, 1000.0),
            ray_extension_factor: 3.0,
            propagation: PropagationMode::Broadcast,
            tick_interval: Duration::from_millis(50),
        }
    }
}

impl LightTableDesc {
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.bench_size;
        if !(width > 0.0 && height > 0.0) {
            return Err(OpticBenchError::Configuration(format!(
                "bench size must be positive, got ({}, {})",
                width, height
            )));
        }
        if !(self.ray_extension_factor > 0.0) {
            return Err(OpticBenchError::Configuration(format!(
                "ray extension factor must be positive, got {}",
                self.ray_extension_factor
            )));
        }
        Ok(())
    }
}
