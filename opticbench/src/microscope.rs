//! Microscope assembly: an ordered set of components with an imaging mode.

use crate::components::Component;
use crate::error::{OpticBenchError, Result};
use crate::propagation::{self, PropagationOutcome};
use crate::ray::Ray;
use std::str::FromStr;

/// Illumination mode of the microscope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MicroscopeMode {
    /// Total internal reflection fluorescence
    #[default]
    Tirf,
    Epifluorescence,
}

impl MicroscopeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tirf => "TIRF",
            Self::Epifluorescence => "Epifluorescence",
        }
    }
}

impl std::fmt::Display for MicroscopeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MicroscopeMode {
    type Err = OpticBenchError;

    fn from_str(mode: &str) -> Result<Self> {
        match mode {
            "TIRF" => Ok(Self::Tirf),
            "Epifluorescence" => Ok(Self::Epifluorescence),
            other => Err(OpticBenchError::Configuration(format!(
                "Invalid microscope mode '{}' (expected \"TIRF\" or \"Epifluorescence\")",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Microscope {
    components: Vec<Component>,
    mode: MicroscopeMode,
}

impl Microscope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, component: impl Into<Component>) {
        self.components.push(component.into());
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn mode(&self) -> MicroscopeMode {
        self.mode
    }

    /// Accepts exactly `"TIRF"` or `"Epifluorescence"`.
    pub fn set_mode(&mut self, mode: &str) -> Result<()> {
        self.mode = mode.parse()?;
        log::info!("Microscope mode set to {}", self.mode);
        Ok(())
    }

    /// Follows one ray through the components in order; see [`propagation::chain`].
    ///
    /// Returns the whole path, starting with `initial_ray`.
    pub fn simulate_light_path(&mut self, initial_ray: Ray) -> Vec<Ray> {
        self.trace(initial_ray).rays
    }

    /// Like [`Microscope::simulate_light_path`] but also reports failing components.
    pub fn trace(&mut self, initial_ray: Ray) -> PropagationOutcome {
        propagation::chain(&mut self.components, initial_ray)
    }

    pub fn into_components(self) -> Vec<Component> {
        self.components
    }
}
