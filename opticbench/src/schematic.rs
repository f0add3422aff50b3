//! 2D geometry descriptors handed to visualization consumers.
//!
//! Nothing in here draws: the bench is projected onto its xy plane and described
//! as simple shapes and line segments that a plotting layer can render as it likes.

use crate::math::{DVec2, DVec3};
use crate::ray::Ray;

/// Number of segments used to approximate a circle outline.
const CIRCLE_SEGMENTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
}

/// Simplified 2D description of a component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schematic {
    pub shape: ShapeKind,
    /// Centre of the shape on the bench
    pub position: DVec2,
    /// xy projection of the component's orientation (not renormalized)
    pub orientation: DVec2,
    /// `(width, height)` for rectangles, `(diameter, diameter)` for circles
    pub size: DVec2,
}

impl Schematic {
    pub fn rectangle(position: DVec3, orientation: DVec3, size: DVec2) -> Self {
        Self {
            shape: ShapeKind::Rectangle,
            position: position.truncate(),
            orientation: orientation.truncate(),
            size,
        }
    }

    pub fn circle(position: DVec3, orientation: DVec3, diameter: f64) -> Self {
        Self {
            shape: ShapeKind::Circle,
            position: position.truncate(),
            orientation: orientation.truncate(),
            size: DVec2::splat(diameter),
        }
    }

    /// Closed polyline tracing the shape's outline (first point repeated last).
    pub fn outline(&self) -> Vec<DVec2> {
        match self.shape {
            ShapeKind::Rectangle => {
                let half = self.size / 2.0;
                let p = self.position;
                vec![
                    DVec2::new(p.x - half.x, p.y - half.y),
                    DVec2::new(p.x + half.x, p.y - half.y),
                    DVec2::new(p.x + half.x, p.y + half.y),
                    DVec2::new(p.x - half.x, p.y + half.y),
                    DVec2::new(p.x - half.x, p.y - half.y),
                ]
            }
            ShapeKind::Circle => {
                let radius = self.size.x / 2.0;
                (0..=CIRCLE_SEGMENTS)
                    .map(|i| {
                        let angle = std::f64::consts::TAU * (i % CIRCLE_SEGMENTS) as f64
                            / CIRCLE_SEGMENTS as f64;
                        self.position + radius * DVec2::from_angle(angle)
                    })
                    .collect()
            }
        }
    }
}

/// A ray projected onto the bench plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySegment {
    pub start: DVec2,
    pub end: DVec2,
    pub wavelength: f64,
    pub intensity: f64,
}

impl From<&Ray> for RaySegment {
    fn from(ray: &Ray) -> Self {
        Self {
            start: ray.origin().truncate(),
            end: ray.end().truncate(),
            wavelength: ray.wavelength(),
            intensity: ray.intensity(),
        }
    }
}

impl RaySegment {
    /// Segment of a fixed drawing length instead of the ray's own length.
    pub fn with_draw_length(ray: &Ray, draw_length: f64) -> Self {
        Self {
            end: ray.point_at(draw_length).truncate(),
            ..Self::from(ray)
        }
    }
}

pub fn project_rays(rays: &[Ray]) -> Vec<RaySegment> {
    rays.iter().map(RaySegment::from).collect()
}

/// Everything a bench view needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SchematicFrame {
    pub bench_size: DVec2,
    pub components: Vec<Schematic>,
    pub rays: Vec<RaySegment>,
}
