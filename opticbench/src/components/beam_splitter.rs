use super::{ComponentBase, ComponentKind, OpticalComponent};
use crate::error::{DomainError, Result};
use crate::math::{DVec3, normalize, reflect};
use crate::ray::Ray;

/// Partially reflective plate producing a reflected and a transmitted ray.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamSplitter {
    base: ComponentBase,
    /// Fraction of the incoming intensity sent along the reflected ray, in `[0, 1]`
    split_ratio: f64,
}

impl BeamSplitter {
    /// `split_ratio` is clamped to `[0, 1]`.
    pub fn new(position: DVec3, orientation: DVec3, split_ratio: f64) -> Result<Self> {
        Ok(Self {
            base: ComponentBase::new(position, orientation)?,
            split_ratio: split_ratio.clamp(0.0, 1.0),
        })
    }

    pub fn split_ratio(&self) -> f64 {
        self.split_ratio
    }

    /// Same construction as [`super::Mirror::normal`] but without the fallback:
    /// an orientation along `y` has no normal.
    pub fn normal(&self) -> std::result::Result<DVec3, DomainError> {
        normalize(self.base.orientation.cross(DVec3::Y))
    }
}

impl OpticalComponent for BeamSplitter {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::BeamSplitter
    }

    /// Returns `[reflected, transmitted]`.
    fn interact_with_light(&mut self, ray: &Ray) -> std::result::Result<Vec<Ray>, DomainError> {
        if !self.base.is_on {
            return Ok(Vec::new());
        }

        let position = self.base.position;
        let reflected_direction = reflect(ray.direction(), self.normal()?);
        let intensity = ray.intensity();

        let reflected = ray
            .redirected(position, reflected_direction)?
            .with_intensity(intensity * self.split_ratio);
        let transmitted = ray
            .redirected(position, ray.direction())?
            .with_intensity(intensity * (1.0 - self.split_ratio));

        Ok(vec![reflected, transmitted])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_into_reflected_and_transmitted() {
        let mut splitter =
            BeamSplitter::new(DVec3::new(10.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 1.0), 0.3).unwrap();
        let incoming = Ray::new(DVec3::ZERO, DVec3::X, 488.0).unwrap();

        let out = splitter.interact_with_light(&incoming).unwrap();
        assert_eq!(out.len(), 2);

        let (reflected, transmitted) = (&out[0], &out[1]);
        assert!(transmitted.direction().abs_diff_eq(DVec3::X, 1e-12));
        // 45 degree plate: +x is folded onto +z
        assert!(reflected.direction().abs_diff_eq(DVec3::Z, 1e-12));
        for ray in &out {
            assert_eq!(ray.origin(), DVec3::new(10.0, 0.0, 0.0));
            assert_eq!(ray.wavelength(), 488.0);
        }

        assert!((reflected.intensity() - 0.3).abs() < 1e-12);
        assert!((transmitted.intensity() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_split_ratio_is_clamped() {
        let splitter = BeamSplitter::new(DVec3::ZERO, DVec3::X, 1.5).unwrap();
        assert_eq!(splitter.split_ratio(), 1.0);
    }

    #[test]
    fn test_orientation_along_y_is_degenerate() {
        let mut splitter = BeamSplitter::new(DVec3::ZERO, DVec3::Y, 0.5).unwrap();
        let incoming = Ray::new(DVec3::ZERO, DVec3::X, 488.0).unwrap();
        assert_eq!(
            splitter.interact_with_light(&incoming),
            Err(DomainError::ZeroLengthVector)
        );
    }
}
