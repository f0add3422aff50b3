use super::{ComponentBase, ComponentKind, OpticalComponent};
use crate::error::{DomainError, Result};
use crate::math::{DVec2, DVec3, is_near_zero, normalize, reflect};
use crate::ray::Ray;

/// A flat reflective surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Mirror {
    base: ComponentBase,
}

impl Mirror {
    /// `size` is the reflective extent; it only affects the schematic.
    pub fn new(position: DVec3, orientation: DVec3, size: DVec2) -> Result<Self> {
        Ok(Self {
            base: ComponentBase::new(position, orientation)?.with_size(size),
        })
    }

    pub fn size(&self) -> DVec2 {
        self.base.size
    }

    /// `orientation × +y`, or `+z` when the orientation is (anti)parallel to `+y`.
    pub fn normal(&self) -> std::result::Result<DVec3, DomainError> {
        let normal = self.base.orientation.cross(DVec3::Y);
        if is_near_zero(normal) {
            Ok(DVec3::Z)
        } else {
            normalize(normal)
        }
    }
}

impl OpticalComponent for Mirror {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Mirror
    }

    fn interact_with_light(&mut self, ray: &Ray) -> std::result::Result<Vec<Ray>, DomainError> {
        if !self.base.is_on {
            return Ok(Vec::new());
        }

        let reflected = reflect(ray.direction(), self.normal()?);
        Ok(vec![ray.redirected(self.base.position, reflected)?])
    }
}
