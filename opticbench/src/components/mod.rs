//! Optical components placed on the bench.
//!
//! Every component implements [`OpticalComponent`]: it receives a [`Ray`] and answers
//! with zero, one or two new rays. Components never mutate the incoming ray.
//!
//! The light table stores components as the closed [`Component`] enum so it can keep
//! typed references to its laser and camera without downcasting.
//!
//! # Example
//!
//! ```
//! use opticbench::components::{Filter, OpticalComponent, PassBand};
//! use opticbench::math::DVec3;
//! use opticbench::ray::Ray;
//!
//! let mut filter = Filter::new(DVec3::ZERO, DVec3::X, PassBand::new(480.0, 500.0)?)?;
//! let ray = Ray::new(DVec3::new(-1.0, 0.0, 0.0), DVec3::X, 488.0)?;
//! assert_eq!(filter.interact_with_light(&ray)?.len(), 1);
//! # Ok::<(), opticbench::OpticBenchError>(())
//! ```

mod beam_splitter;
mod camera;
mod filter;
mod laser;
mod lens;
mod mirror;
mod objective;

pub use beam_splitter::BeamSplitter;
pub use camera::Camera;
pub use filter::{Filter, PassBand};
pub use laser::Laser;
pub use lens::Lens;
pub use mirror::Mirror;
pub use objective::Objective;

use crate::error::DomainError;
use crate::math::{DVec2, DVec3, normalize};
use crate::ray::Ray;
use crate::schematic::Schematic;

/// Size used for the schematic of components that don't define their own.
pub const DEFAULT_SCHEMATIC_SIZE: DVec2 = DVec2::new(20.0, 20.0);

/// State shared by every component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentBase {
    pub(crate) position: DVec3,
    /// Always unit length
    pub(crate) orientation: DVec3,
    pub(crate) is_on: bool,
    /// Schematic extent `(width, height)`
    pub(crate) size: DVec2,
}

impl ComponentBase {
    /// Fails if `orientation` is the zero vector.
    pub fn new(position: DVec3, orientation: DVec3) -> Result<Self, DomainError> {
        Ok(Self {
            position,
            orientation: normalize(orientation)?,
            is_on: true,
            size: DEFAULT_SCHEMATIC_SIZE,
        })
    }

    pub(crate) fn with_size(mut self, size: DVec2) -> Self {
        self.size = size;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Laser,
    Mirror,
    Lens,
    BeamSplitter,
    Filter,
    Objective,
    Camera,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Laser => "Laser",
            Self::Mirror => "Mirror",
            Self::Lens => "Lens",
            Self::BeamSplitter => "BeamSplitter",
            Self::Filter => "Filter",
            Self::Objective => "Objective",
            Self::Camera => "Camera",
        };
        f.write_str(name)
    }
}

/// Trait implemented by everything that can sit on the bench.
pub trait OpticalComponent {
    fn base(&self) -> &ComponentBase;

    fn base_mut(&mut self) -> &mut ComponentBase;

    fn kind(&self) -> ComponentKind;

    /// Reacts to an incoming ray.
    ///
    /// # Returns
    ///
    /// * An empty vector when the ray is absorbed, missed, or the component is off
    /// * One or two new rays otherwise
    ///
    /// # Errors
    ///
    /// A [`DomainError`] when the component's geometry is degenerate for this ray.
    /// Callers treat it as "no interaction".
    fn interact_with_light(&mut self, ray: &Ray) -> Result<Vec<Ray>, DomainError>;

    fn get_schematic_representation(&self) -> Schematic {
        let base = self.base();
        Schematic::rectangle(base.position, base.orientation, base.size)
    }

    /// Sources emit light and are skipped during propagation.
    fn is_source(&self) -> bool {
        false
    }

    fn position(&self) -> DVec3 {
        self.base().position
    }

    fn orientation(&self) -> DVec3 {
        self.base().orientation
    }

    fn is_on(&self) -> bool {
        self.base().is_on
    }

    fn turn_on(&mut self) {
        self.base_mut().is_on = true;
    }

    fn turn_off(&mut self) {
        self.base_mut().is_on = false;
    }
}

/// Any component the bench knows about.
#[derive(Debug, Clone)]
pub enum Component {
    Laser(Laser),
    Mirror(Mirror),
    Lens(Lens),
    BeamSplitter(BeamSplitter),
    Filter(Filter),
    Objective(Objective),
    Camera(Camera),
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Component::Laser($inner) => $body,
            Component::Mirror($inner) => $body,
            Component::Lens($inner) => $body,
            Component::BeamSplitter($inner) => $body,
            Component::Filter($inner) => $body,
            Component::Objective($inner) => $body,
            Component::Camera($inner) => $body,
        }
    };
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Component {
                fn from(component: $variant) -> Self {
                    Component::$variant(component)
                }
            }
        )*
    };
}

impl_from_variant!(Laser, Mirror, Lens, BeamSplitter, Filter, Objective, Camera);

impl OpticalComponent for Component {
    fn base(&self) -> &ComponentBase {
        dispatch!(self, c => c.base())
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        dispatch!(self, c => c.base_mut())
    }

    fn kind(&self) -> ComponentKind {
        dispatch!(self, c => c.kind())
    }

    fn interact_with_light(&mut self, ray: &Ray) -> Result<Vec<Ray>, DomainError> {
        dispatch!(self, c => c.interact_with_light(ray))
    }

    fn get_schematic_representation(&self) -> Schematic {
        dispatch!(self, c => c.get_schematic_representation())
    }

    fn is_source(&self) -> bool {
        dispatch!(self, c => c.is_source())
    }
}

impl Component {
    pub fn as_laser(&self) -> Option<&Laser> {
        match self {
            Self::Laser(laser) => Some(laser),
            _ => None,
        }
    }

    pub fn as_laser_mut(&mut self) -> Option<&mut Laser> {
        match self {
            Self::Laser(laser) => Some(laser),
            _ => None,
        }
    }

    pub fn as_camera(&self) -> Option<&Camera> {
        match self {
            Self::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_camera_mut(&mut self) -> Option<&mut Camera> {
        match self {
            Self::Camera(camera) => Some(camera),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schematic::ShapeKind;

    #[test]
    fn test_base_normalizes_orientation() {
        let base = ComponentBase::new(DVec3::ZERO, DVec3::new(0.0, 2.0, 0.0)).unwrap();
        assert_eq!(base.orientation, DVec3::Y);
        assert!(base.is_on);
        assert_eq!(base.size, DEFAULT_SCHEMATIC_SIZE);

        assert_eq!(
            ComponentBase::new(DVec3::ZERO, DVec3::ZERO),
            Err(DomainError::ZeroLengthVector)
        );
    }

    #[test]
    fn test_enum_dispatch_and_toggle() {
        let mut component: Component = Mirror::new(DVec3::ONE, DVec3::X, DVec2::new(10.0, 4.0))
            .unwrap()
            .into();
        assert_eq!(component.kind(), ComponentKind::Mirror);
        assert!(component.as_laser().is_none());
        assert!(component.is_on());

        component.turn_off();
        assert!(!component.is_on());
        let ray = Ray::new(DVec3::ZERO, DVec3::X, 500.0).unwrap();
        assert!(component.interact_with_light(&ray).unwrap().is_empty());

        component.turn_on();
        assert_eq!(component.interact_with_light(&ray).unwrap().len(), 1);
    }

    #[test]
    fn test_schematic_shapes() {
        let mirror: Component = Mirror::new(DVec3::ZERO, DVec3::X, DVec2::new(10.0, 4.0))
            .unwrap()
            .into();
        let lens: Component = Lens::new(DVec3::ZERO, DVec3::X, 50.0, 25.0).unwrap().into();
        let objective: Component = Objective::new(DVec3::ZERO, DVec3::X, 60.0, 1.49)
            .unwrap()
            .into();
        let filter: Component = Filter::new(DVec3::ZERO, DVec3::X, PassBand::new(1.0, 2.0).unwrap())
            .unwrap()
            .into();

        assert_eq!(mirror.get_schematic_representation().shape, ShapeKind::Rectangle);
        assert_eq!(mirror.get_schematic_representation().size, DVec2::new(10.0, 4.0));
        assert_eq!(lens.get_schematic_representation().shape, ShapeKind::Circle);
        assert_eq!(lens.get_schematic_representation().size, DVec2::splat(25.0));
        assert_eq!(objective.get_schematic_representation().size, DVec2::splat(30.0));
        assert_eq!(filter.get_schematic_representation().size, DEFAULT_SCHEMATIC_SIZE);
    }
}
