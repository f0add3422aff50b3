use super::{ComponentBase, ComponentKind, OpticalComponent};
use crate::error::{DomainError, Result};
use crate::math::{DVec3, normalize};
use crate::ray::Ray;

/// Light source at the head of the bench.
///
/// The emission direction is driven by two angles rather than by the laser's
/// orientation: `angle_x` swings the beam in the xz plane and `angle_y` tilts it
/// towards +y. With both at zero the beam travels along +z.
#[derive(Debug, Clone, PartialEq)]
pub struct Laser {
    base: ComponentBase,
    /// Wavelength in nanometres
    wavelength: f64,
    power: f64,
    /// Radians
    angle_x: f64,
    /// Radians
    angle_y: f64,
}

impl Laser {
    pub fn new(position: DVec3, orientation: DVec3, wavelength: f64, power: f64) -> Result<Self> {
        Ok(Self {
            base: ComponentBase::new(position, orientation)?,
            wavelength,
            power,
            angle_x: 0.0,
            angle_y: 0.0,
        })
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn set_power(&mut self, power: f64) {
        self.power = power;
    }

    pub fn angles(&self) -> (f64, f64) {
        (self.angle_x, self.angle_y)
    }

    pub fn set_angles(&mut self, angle_x: f64, angle_y: f64) {
        self.angle_x = angle_x;
        self.angle_y = angle_y;
    }

    pub fn calculate_direction(&self) -> std::result::Result<DVec3, DomainError> {
        let (sin_x, cos_x) = self.angle_x.sin_cos();
        let (sin_y, cos_y) = self.angle_y.sin_cos();
        normalize(DVec3::new(cos_y * sin_x, sin_y, cos_y * cos_x))
    }

    /// Emits a default-length ray from the laser's position.
    pub fn emit_light(&self) -> std::result::Result<Ray, DomainError> {
        let direction = self.calculate_direction()?;
        log::trace!(
            "Laser emitting light from {:?} in direction {:?}",
            self.base.position,
            direction
        );
        Ray::new(self.base.position, direction, self.wavelength)
    }
}

impl OpticalComponent for Laser {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Laser
    }

    /// A laser only emits; incoming light passes it by.
    fn interact_with_light(&mut self, _ray: &Ray) -> std::result::Result<Vec<Ray>, DomainError> {
        Ok(Vec::new())
    }

    fn is_source(&self) -> bool {
        true
    }
}
