use super::{ComponentBase, ComponentKind, OpticalComponent};
use crate::error::{DomainError, OpticBenchError, Result};
use crate::math::DVec3;
use crate::ray::Ray;

/// Inclusive wavelength window, in nanometres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassBand {
    min: f64,
    max: f64,
}

impl PassBand {
    /// Emission band commonly paired with 488 nm excitation
    pub const GFP_EMISSION: Self = Self {
        min: 500.0,
        max: 550.0,
    };

    /// Narrow band around the 488 nm laser line
    pub const LINE_488: Self = Self {
        min: 480.0,
        max: 500.0,
    };

    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min <= max) {
            return Err(OpticBenchError::Configuration(format!(
                "pass band minimum {} exceeds maximum {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, wavelength: f64) -> bool {
        self.min <= wavelength && wavelength <= self.max
    }
}

/// Band-pass filter: transmits in-band rays and absorbs the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    base: ComponentBase,
    pass_band: PassBand,
}

impl Filter {
    pub fn new(position: DVec3, orientation: DVec3, pass_band: PassBand) -> Result<Self> {
        Ok(Self {
            base: ComponentBase::new(position, orientation)?,
            pass_band,
        })
    }

    pub fn pass_band(&self) -> PassBand {
        self.pass_band
    }
}

impl OpticalComponent for Filter {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Filter
    }

    fn interact_with_light(&mut self, ray: &Ray) -> std::result::Result<Vec<Ray>, DomainError> {
        if !self.base.is_on || !self.pass_band.contains(ray.wavelength()) {
            return Ok(Vec::new());
        }
        Ok(vec![ray.redirected(self.base.position, ray.direction())?])
    }
}
