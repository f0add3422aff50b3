use crate::components::{Camera, Component, Laser, OpticalComponent};
use crate::config::{LightTableDesc, PropagationMode};
use crate::error::{DomainError, OpticBenchError, Result};
use crate::math::{DVec2, DVec3};
use crate::propagation::{self, ComponentFailure};
use crate::ray::Ray;
use crate::schematic::{RaySegment, Schematic, SchematicFrame, project_rays};

/// Summary of one simulation tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Number of rays tracked after the tick
    pub ray_count: usize,
    /// Pixel the camera recorded this tick, if any
    pub camera_hit: Option<DVec2>,
    pub failures: Vec<ComponentFailure>,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.ray_count == 0
    }
}

/// The bench: an ordered list of components plus the rays of the last tick.
///
/// `LightTable` keeps a typed slot for its active laser and camera. The first laser
/// and the first camera added fill those slots; later ones sit on the bench as
/// ordinary components.
///
/// # Tick
///
/// [`LightTable::simulate_light_path`] emits one ray from the laser, stretches it
/// past the camera, and hands it to the other components according to the
/// descriptor's [`PropagationMode`].
pub struct LightTable {
    desc: LightTableDesc,
    components: Vec<Component>,
    laser_slot: Option<usize>,
    camera_slot: Option<usize>,
    rays: Vec<Ray>,
}

impl LightTable {
    pub fn new(desc: LightTableDesc) -> Result<Self> {
        desc.validate()?;
        Ok(Self {
            desc,
            components: Vec::new(),
            laser_slot: None,
            camera_slot: None,
            rays: Vec::new(),
        })
    }

    pub fn desc(&self) -> &LightTableDesc {
        &self.desc
    }

    pub fn bench_size(&self) -> DVec2 {
        DVec2::new(self.desc.bench_size.0, self.desc.bench_size.1)
    }

    pub fn propagation_mode(&self) -> PropagationMode {
        self.desc.propagation
    }

    pub fn set_propagation_mode(&mut self, mode: PropagationMode) {
        self.desc.propagation = mode;
    }

    /// Places a component at the end of the bench and returns its index.
    pub fn add_component(&mut self, component: impl Into<Component>) -> usize {
        let component = component.into();
        let index = self.components.len();

        match &component {
            Component::Laser(_) if self.laser_slot.is_none() => self.laser_slot = Some(index),
            Component::Camera(_) if self.camera_slot.is_none() => self.camera_slot = Some(index),
            _ => {}
        }

        log::info!(
            "Added component #{}: {} at {:?}",
            index,
            component.kind(),
            component.position()
        );
        self.components.push(component);
        index
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn component_mut(&mut self, index: usize) -> Result<&mut Component> {
        let count = self.components.len();
        self.components.get_mut(index).ok_or_else(|| {
            OpticBenchError::Component(format!(
                "No component at index {} (bench has {})",
                index, count
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn laser_index(&self) -> Option<usize> {
        self.laser_slot
    }

    pub fn camera_index(&self) -> Option<usize> {
        self.camera_slot
    }

    pub fn laser(&self) -> Option<&Laser> {
        self.laser_slot
            .and_then(|index| self.components.get(index))
            .and_then(Component::as_laser)
    }

    pub fn laser_mut(&mut self) -> Option<&mut Laser> {
        self.laser_slot
            .and_then(|index| self.components.get_mut(index))
            .and_then(Component::as_laser_mut)
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera_slot
            .and_then(|index| self.components.get(index))
            .and_then(Component::as_camera)
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera_slot
            .and_then(|index| self.components.get_mut(index))
            .and_then(Component::as_camera_mut)
    }

    /// Runs one simulation tick.
    ///
    /// Without a laser or a camera, or with the laser off, the tick produces no rays
    /// and leaves the image alone. Component failures are collected in the report
    /// and never abort the tick.
    pub fn simulate_light_path(&mut self) -> TickReport {
        self.rays.clear();
        let mut report = TickReport::default();

        let (Some(laser), Some(camera)) = (self.laser(), self.camera()) else {
            log::debug!("Light table needs a laser and a camera; nothing to simulate");
            return report;
        };
        if !laser.is_on() {
            log::trace!("Laser is off; no light this tick");
            return report;
        }

        let camera_position = camera.position();
        let hits_before = camera.hit_count();

        let extended = match laser
            .emit_light()
            .and_then(|ray| self.extend_ray(ray, camera_position))
        {
            Ok(ray) => ray,
            Err(error) => {
                log::debug!("Laser could not emit this tick: {}", error);
                if let Some(index) = self.laser_slot {
                    report.failures.push(ComponentFailure {
                        index,
                        kind: laser.kind(),
                        error,
                    });
                }
                return report;
            }
        };

        match self.desc.propagation {
            PropagationMode::Broadcast => {
                self.rays.push(extended);
                report.failures = propagation::broadcast(&mut self.components, &extended);
            }
            PropagationMode::Chained => {
                let outcome = propagation::chain(&mut self.components, extended);
                self.rays = outcome.rays;
                report.failures = outcome.failures;
            }
        }

        report.ray_count = self.rays.len();
        report.camera_hit = self
            .camera()
            .filter(|camera| camera.hit_count() > hits_before)
            .and_then(Camera::last_hit);

        log::debug!(
            "Simulated light path with {} rays ({} failures)",
            report.ray_count,
            report.failures.len()
        );
        report
    }

    /// Stretches `ray` to `ray_extension_factor` times its distance to `target`, so
    /// it reaches the camera plane even when the camera is off-axis.
    pub fn extend_ray(&self, ray: Ray, target: DVec3) -> std::result::Result<Ray, DomainError> {
        let distance = target.distance(ray.origin());
        let extended = ray.with_length(distance * self.desc.ray_extension_factor)?;
        log::trace!(
            "Extended ray: origin={:?}, direction={:?}, length={}",
            extended.origin(),
            extended.direction(),
            extended.length()
        );
        Ok(extended)
    }

    pub fn get_schematic_representation(&self) -> Vec<Schematic> {
        self.components
            .iter()
            .map(OpticalComponent::get_schematic_representation)
            .collect()
    }

    /// Rays tracked by the last tick.
    pub fn get_rays(&self) -> &[Ray] {
        &self.rays
    }

    pub fn ray_segments(&self) -> Vec<RaySegment> {
        project_rays(&self.rays)
    }

    pub fn schematic_frame(&self) -> SchematicFrame {
        SchematicFrame {
            bench_size: self.bench_size(),
            components: self.get_schematic_representation(),
            rays: self.ray_segments(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Filter, Mirror, PassBand};
    use std::f64::consts::FRAC_PI_2;

    /// Laser at (100, 500, 0) aimed along +x at a camera at (600, 500, 0) facing -x.
    fn bench(mode: PropagationMode) -> LightTable {
        let mut table = LightTable::new(LightTableDesc {
            propagation: mode,
            ..Default::default()
        })
        .unwrap();

        let mut laser = Laser::new(DVec3::new(100.0, 500.0, 0.0), DVec3::X, 488.0, 100.0).unwrap();
        laser.set_angles(FRAC_PI_2, 0.0);
        table.add_component(laser);
        table.add_component(Camera::new(DVec3::new(600.0, 500.0, 0.0), -DVec3::X).unwrap());
        table
    }

    #[test]
    fn test_slots_take_first_laser_and_camera() {
        let mut table = bench(PropagationMode::Broadcast);
        let second = table.add_component(Camera::new(DVec3::ZERO, DVec3::X).unwrap());

        assert_eq!(table.laser_index(), Some(0));
        assert_eq!(table.camera_index(), Some(1));
        assert_eq!(second, 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_tick_extends_ray_and_hits_camera() {
        let mut table = bench(PropagationMode::Broadcast);
        let report = table.simulate_light_path();

        assert_eq!(report.ray_count, 1);
        assert!(report.failures.is_empty());
        let ray = table.get_rays()[0];
        assert!((ray.length() - 1500.0).abs() < 1e-9);
        assert!(ray.direction().abs_diff_eq(DVec3::X, 1e-12));

        // The beam meets the sensor at its origin corner
        let hit = report.camera_hit.unwrap();
        assert!(hit.abs_diff_eq(DVec2::ZERO, 1e-6));
        assert!(table.camera().unwrap().image().max_value() > 0.0);
    }

    #[test]
    fn test_tick_without_camera_is_empty() {
        let mut table = LightTable::new(LightTableDesc::default()).unwrap();
        table.add_component(Laser::new(DVec3::ZERO, DVec3::X, 488.0, 1.0).unwrap());
        table.add_component(Mirror::new(DVec3::X, DVec3::Z, DVec2::ONE).unwrap());

        let report = table.simulate_light_path();
        assert!(report.is_idle());
        assert!(report.failures.is_empty());
        assert!(table.get_rays().is_empty());
        assert!(table.camera().is_none());
    }

    #[test]
    fn test_tick_with_laser_off_is_empty() {
        let mut table = bench(PropagationMode::Broadcast);
        table.laser_mut().unwrap().turn_off();

        assert!(table.simulate_light_path().is_idle());
        assert!(table.camera().unwrap().image().is_blank());
    }

    #[test]
    fn test_rays_are_reset_every_tick() {
        let mut table = bench(PropagationMode::Broadcast);
        table.simulate_light_path();
        assert_eq!(table.get_rays().len(), 1);

        table.laser_mut().unwrap().turn_off();
        table.simulate_light_path();
        assert!(table.get_rays().is_empty());
    }

    #[test]
    fn test_laser_on_camera_position_reports_failure() {
        let mut table = LightTable::new(LightTableDesc::default()).unwrap();
        table.add_component(Laser::new(DVec3::ZERO, DVec3::X, 488.0, 1.0).unwrap());
        table.add_component(Camera::new(DVec3::ZERO, -DVec3::X).unwrap());

        let report = table.simulate_light_path();
        assert!(report.is_idle());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 0);
        assert_eq!(report.failures[0].error, DomainError::NonPositiveLength(0.0));
    }

    #[test]
    fn test_broadcast_feeds_the_original_ray_to_everyone() {
        let mut table = bench(PropagationMode::Broadcast);
        // A filter that blocks 488 nm sits before the camera; broadcast ignores it
        table.add_component(
            Filter::new(DVec3::new(300.0, 500.0, 0.0), DVec3::X, PassBand::GFP_EMISSION).unwrap(),
        );
        let report = table.simulate_light_path();
        assert!(report.camera_hit.is_some());
        assert_eq!(table.get_rays().len(), 1);
    }

    #[test]
    fn test_chained_mode_respects_component_order() {
        let mut table = LightTable::new(LightTableDesc {
            propagation: PropagationMode::Chained,
            ..Default::default()
        })
        .unwrap();
        let mut laser = Laser::new(DVec3::new(100.0, 500.0, 0.0), DVec3::X, 488.0, 100.0).unwrap();
        laser.set_angles(FRAC_PI_2, 0.0);
        table.add_component(laser);
        table.add_component(
            Filter::new(DVec3::new(300.0, 500.0, 0.0), DVec3::X, PassBand::GFP_EMISSION).unwrap(),
        );
        table.add_component(Camera::new(DVec3::new(600.0, 500.0, 0.0), -DVec3::X).unwrap());

        let report = table.simulate_light_path();
        assert!(report.camera_hit.is_none());
        assert_eq!(report.ray_count, 1);
        assert!(table.camera().unwrap().image().is_blank());

        table.set_propagation_mode(PropagationMode::Broadcast);
        assert!(table.simulate_light_path().camera_hit.is_some());
    }

    #[test]
    fn test_schematic_frame() {
        let mut table = bench(PropagationMode::Broadcast);
        table.simulate_light_path();

        let frame = table.schematic_frame();
        assert_eq!(frame.bench_size, DVec2::new(1000.0, 1000.0));
        assert_eq!(frame.components.len(), 2);
        assert_eq!(frame.components[1].size, DVec2::new(100.0, 100.0));
        assert_eq!(frame.rays.len(), 1);
        assert!(frame.rays[0].end.abs_diff_eq(DVec2::new(1600.0, 500.0), 1e-9));
    }

    #[test]
    fn test_component_mut_out_of_range() {
        let mut table = bench(PropagationMode::Broadcast);
        assert!(matches!(
            table.component_mut(9),
            Err(OpticBenchError::Component(_))
        ));
    }
}
