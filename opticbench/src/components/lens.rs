use super::{ComponentBase, ComponentKind, OpticalComponent};
use crate::error::{DomainError, Result};
use crate::math::{DVec3, normalize};
use crate::ray::Ray;
use crate::schematic::Schematic;

/// Weight of the pull towards the focal point.
const FOCUS_PULL: f64 = 0.1;

/// A converging lens.
///
/// This is a small-angle heuristic rather than thin-lens refraction: the outgoing
/// direction is the incoming one nudged towards the focal point, which sits
/// `focal_length` along the lens's orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Lens {
    base: ComponentBase,
    focal_length: f64,
    diameter: f64,
}

impl Lens {
    pub fn new(position: DVec3, orientation: DVec3, focal_length: f64, diameter: f64) -> Result<Self> {
        Ok(Self {
            base: ComponentBase::new(position, orientation)?,
            focal_length,
            diameter,
        })
    }

    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn focal_point(&self) -> DVec3 {
        self.base.position + self.base.orientation * self.focal_length
    }
}

impl OpticalComponent for Lens {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Lens
    }

    fn interact_with_light(&mut self, ray: &Ray) -> std::result::Result<Vec<Ray>, DomainError> {
        if !self.base.is_on {
            return Ok(Vec::new());
        }

        let to_focal = self.focal_point() - ray.origin();
        let new_direction = normalize(ray.direction() + to_focal * FOCUS_PULL)?;
        Ok(vec![ray.redirected(self.base.position, new_direction)?])
    }

    fn get_schematic_representation(&self) -> Schematic {
        Schematic::circle(self.base.position, self.base.orientation, self.diameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lens_bends_towards_focal_point() {
        let mut lens = Lens::new(DVec3::new(10.0, 0.0, 0.0), DVec3::X, 50.0, 25.0).unwrap();
        assert_eq!(lens.focal_point(), DVec3::new(60.0, 0.0, 0.0));

        // Off-axis ray travelling along +x from y = 5
        let incoming = Ray::new(DVec3::new(0.0, 5.0, 0.0), DVec3::X, 488.0).unwrap();
        let out = lens.interact_with_light(&incoming).unwrap();
        assert_eq!(out.len(), 1);

        // direction + (60, -5, 0) * 0.1 = (7, -0.5, 0)
        let expected = DVec3::new(7.0, -0.5, 0.0).normalize();
        assert!(out[0].direction().abs_diff_eq(expected, 1e-12));
        assert_eq!(out[0].origin(), DVec3::new(10.0, 0.0, 0.0));
        assert!(out[0].direction().y < 0.0);
    }

    #[test]
    fn test_lens_degenerate_bend() {
        // to_focal * 0.1 exactly cancels the incoming direction
        let mut lens = Lens::new(DVec3::ZERO, DVec3::X, 0.0, 10.0).unwrap();
        let incoming = Ray::new(DVec3::new(10.0, 0.0, 0.0), DVec3::X, 488.0).unwrap();
        assert_eq!(
            lens.interact_with_light(&incoming),
            Err(DomainError::ZeroLengthVector)
        );
    }
}
