use super::{ComponentBase, ComponentKind, OpticalComponent};
use crate::error::{DomainError, Result};
use crate::math::{DVec3, normalize};
use crate::ray::Ray;
use crate::schematic::Schematic;

/// Diameter of the objective's schematic circle.
const SCHEMATIC_DIAMETER: f64 = 30.0;

/// Microscope objective. Bends rays towards its optical axis in proportion to its
/// numerical aperture.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    base: ComponentBase,
    magnification: f64,
    numerical_aperture: f64,
}

impl Objective {
    pub fn new(
        position: DVec3,
        orientation: DVec3,
        magnification: f64,
        numerical_aperture: f64,
    ) -> Result<Self> {
        Ok(Self {
            base: ComponentBase::new(position, orientation)?,
            magnification,
            numerical_aperture,
        })
    }

    pub fn magnification(&self) -> f64 {
        self.magnification
    }

    pub fn numerical_aperture(&self) -> f64 {
        self.numerical_aperture
    }

    fn bend_factor(&self) -> f64 {
        0.1 * self.numerical_aperture
    }
}

impl OpticalComponent for Objective {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Objective
    }

    fn interact_with_light(&mut self, ray: &Ray) -> std::result::Result<Vec<Ray>, DomainError> {
        if !self.base.is_on {
            return Ok(Vec::new());
        }

        let optical_axis = self.base.orientation;
        let new_direction = normalize(ray.direction() + optical_axis * self.bend_factor())?;
        Ok(vec![ray.redirected(self.base.position, new_direction)?])
    }

    fn get_schematic_representation(&self) -> Schematic {
        Schematic::circle(self.base.position, self.base.orientation, SCHEMATIC_DIAMETER)
    }
}
