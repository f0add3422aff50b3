use crate::components::OpticalComponent;
use crate::config::LightTableDesc;
use crate::error::{OpticBenchError, Result};
use crate::events::OpticBenchEvent;
use crate::image::SensorImage;
use crate::light_table::{LightTable, TickReport};
use crate::microscope::{Microscope, MicroscopeMode};
use crate::ray::Ray;
use crate::schematic::{RaySegment, Schematic, SchematicFrame};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::time::Duration;

/// Events kept between two [`SimulationEngine::poll_events`] calls; older ones are
/// discarded first.
pub const EVENT_QUEUE_CAPACITY: usize = 1024;

/// What a display cycle hands to the visualization layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Camera image captured this cycle (zeros if the camera is off), `None` without a camera
    pub image: Option<SensorImage>,
    pub schematic: SchematicFrame,
    pub report: TickReport,
}

/// Simulation engine driving a light table.
///
/// The engine owns the [`LightTable`] and exposes the control surface used by an
/// external driver: start/stop, laser steering, component toggling. Ticks only
/// have an effect while the engine is running. Everything happens on the caller's
/// thread; the driver is expected to call [`SimulationEngine::update`] every
/// [`SimulationEngine::tick_interval`].
///
/// Notable changes are queued as [`OpticBenchEvent`]s and drained with
/// [`SimulationEngine::poll_events`]. The queue holds at most
/// [`EVENT_QUEUE_CAPACITY`] events; a driver that never polls only loses the
/// oldest ones.
pub struct SimulationEngine {
    table: LightTable,
    mode: MicroscopeMode,
    is_running: bool,
    ticks: u64,
    event_sender: Sender<OpticBenchEvent>,
    event_receiver: Receiver<OpticBenchEvent>,
    dropped_events: u64,
}

impl SimulationEngine {
    /// Moves the microscope's components onto a new light table, in order.
    pub fn new(microscope: Microscope, desc: LightTableDesc) -> Result<Self> {
        let mode = microscope.mode();
        let mut table = LightTable::new(desc)?;
        for component in microscope.into_components() {
            table.add_component(component);
        }
        log::info!("Light table set up with {} components", table.len());

        let mut engine = Self::from_table(table);
        engine.mode = mode;
        Ok(engine)
    }

    pub fn from_table(table: LightTable) -> Self {
        let (event_sender, event_receiver) = bounded(EVENT_QUEUE_CAPACITY);
        Self {
            table,
            mode: MicroscopeMode::default(),
            is_running: false,
            ticks: 0,
            event_sender,
            event_receiver,
            dropped_events: 0,
        }
    }

    pub fn start(&mut self) {
        if self.is_running {
            return;
        }
        self.is_running = true;
        log::info!("Simulation started");
        self.emit(OpticBenchEvent::SimulationStarted);
    }

    pub fn stop(&mut self) {
        if !self.is_running {
            return;
        }
        self.is_running = false;
        log::info!("Simulation stopped");
        self.emit(OpticBenchEvent::SimulationStopped);
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn mode(&self) -> MicroscopeMode {
        self.mode
    }

    /// Number of ticks run since construction.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn tick_interval(&self) -> Duration {
        self.table.desc().tick_interval
    }

    pub fn light_table(&self) -> &LightTable {
        &self.table
    }

    pub fn light_table_mut(&mut self) -> &mut LightTable {
        &mut self.table
    }

    /// Runs one tick if the engine is running; returns `None` otherwise.
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.is_running {
            return None;
        }

        let report = self.table.simulate_light_path();
        self.ticks += 1;

        if let Some(length) = self.table.get_rays().first().map(Ray::length) {
            self.emit(OpticBenchEvent::RayEmitted { length });
        }
        if let Some(pixel) = report.camera_hit {
            self.emit(OpticBenchEvent::CameraHit {
                pixel_x: pixel.x,
                pixel_y: pixel.y,
            });
        }
        for failure in &report.failures {
            self.emit(OpticBenchEvent::ComponentFailed {
                index: failure.index,
                error: failure.error.to_string(),
            });
        }

        Some(report)
    }

    /// One display cycle: tick, capture the camera image, then clear it.
    ///
    /// Returns `None` while the engine is stopped.
    pub fn update(&mut self) -> Option<Frame> {
        let report = self.tick()?;

        let image = self.get_image();
        if let Some(image) = &image {
            log::debug!("Camera image updated, max value: {}", image.max_value());
        }
        self.clear_image();

        Some(Frame {
            image,
            schematic: self.table.schematic_frame(),
            report,
        })
    }

    pub fn set_laser_angles(&mut self, angle_x: f64, angle_y: f64) -> Result<()> {
        self.table
            .laser_mut()
            .ok_or_else(|| OpticBenchError::Component("No laser on the bench".into()))?
            .set_angles(angle_x, angle_y);

        log::info!("Updated laser angles to ({:.2}, {:.2})", angle_x, angle_y);
        self.emit(OpticBenchEvent::LaserAnglesChanged { angle_x, angle_y });
        Ok(())
    }

    pub fn set_laser_power(&mut self, power: f64) -> Result<()> {
        let laser = self
            .table
            .laser_mut()
            .ok_or_else(|| OpticBenchError::Component("No laser on the bench".into()))?;
        let old_power = laser.power();
        laser.set_power(power);

        log::info!("Updated laser power to {}", power);
        self.emit(OpticBenchEvent::LaserPowerChanged {
            old_power,
            new_power: power,
        });
        Ok(())
    }

    pub fn turn_on(&mut self, index: usize) -> Result<()> {
        self.toggle_component(index, true)
    }

    pub fn turn_off(&mut self, index: usize) -> Result<()> {
        self.toggle_component(index, false)
    }

    pub fn toggle_component(&mut self, index: usize, on: bool) -> Result<()> {
        let component = self.table.component_mut(index)?;
        if on {
            component.turn_on();
        } else {
            component.turn_off();
        }

        log::info!(
            "Toggled {} #{} {}",
            component.kind(),
            index,
            if on { "on" } else { "off" }
        );
        self.emit(OpticBenchEvent::ComponentToggled { index, is_on: on });
        Ok(())
    }

    pub fn get_schematic_representation(&self) -> Vec<Schematic> {
        self.table.get_schematic_representation()
    }

    pub fn get_rays(&self) -> &[Ray] {
        self.table.get_rays()
    }

    pub fn ray_segments(&self) -> Vec<RaySegment> {
        self.table.ray_segments()
    }

    pub fn schematic_frame(&self) -> SchematicFrame {
        self.table.schematic_frame()
    }

    /// The active camera's image snapshot, `None` without a camera.
    pub fn get_image(&self) -> Option<SensorImage> {
        self.table.camera().map(|camera| camera.get_image())
    }

    pub fn clear_image(&mut self) {
        if let Some(camera) = self.table.camera_mut() {
            camera.clear_image();
        }
    }

    /// Drains every event queued since the last call.
    pub fn poll_events(&mut self) -> Vec<OpticBenchEvent> {
        if self.dropped_events > 0 {
            log::debug!("{} events were dropped since the last poll", self.dropped_events);
            self.dropped_events = 0;
        }
        self.event_receiver.try_iter().collect()
    }

    /// Events discarded because the queue was full since the last poll.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    fn emit(&mut self, event: OpticBenchEvent) {
        let event = match self.event_sender.try_send(event) {
            Ok(()) => return,
            Err(TrySendError::Full(event)) => event,
            Err(TrySendError::Disconnected(event)) => {
                log::warn!("Dropped simulation event {:?}: queue disconnected", event);
                return;
            }
        };

        // make room by discarding the oldest event
        if self.event_receiver.try_recv().is_ok() {
            if self.dropped_events == 0 {
                log::warn!(
                    "Event queue full ({} events), dropping the oldest until the next poll",
                    EVENT_QUEUE_CAPACITY
                );
            }
            self.dropped_events += 1;
        }
        if let Err(e) = self.event_sender.try_send(event) {
            log::warn!("Dropped simulation event: {}", e);
        }
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        if self.is_running {
            self.is_running = false;
            log::info!("Simulation stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Camera, Laser};
    use crate::math::DVec3;
    use std::f64::consts::FRAC_PI_2;

    fn engine() -> SimulationEngine {
        let mut microscope = Microscope::new();
        microscope.add_component(
            Laser::new(DVec3::new(100.0, 500.0, 0.0), DVec3::X, 488.0, 100.0).unwrap(),
        );
        microscope.add_component(Camera::new(DVec3::new(600.0, 500.0, 0.0), -DVec3::X).unwrap());
        SimulationEngine::new(microscope, LightTableDesc::default()).unwrap()
    }

    #[test]
    fn test_ticks_are_gated_by_running_flag() {
        let mut engine = engine();
        assert!(!engine.is_running());
        assert!(engine.tick().is_none());
        assert!(engine.update().is_none());
        assert_eq!(engine.tick_count(), 0);

        engine.start();
        assert!(engine.tick().is_some());
        assert_eq!(engine.tick_count(), 1);

        engine.stop();
        assert!(engine.tick().is_none());
        assert_eq!(
            engine.poll_events(),
            vec![
                OpticBenchEvent::SimulationStarted,
                OpticBenchEvent::RayEmitted { length: 1500.0 },
                OpticBenchEvent::SimulationStopped,
            ]
        );
    }

    #[test]
    fn test_default_aim_misses_the_camera() {
        // With zero angles the beam runs along +z, parallel to the sensor plane
        let mut engine = engine();
        engine.start();
        let frame = engine.update().unwrap();
        assert!(frame.report.camera_hit.is_none());
        assert!(frame.image.unwrap().is_blank());
    }

    #[test]
    fn test_update_captures_then_clears() {
        let mut engine = engine();
        engine.set_laser_angles(FRAC_PI_2, 0.0).unwrap();
        engine.start();

        let frame = engine.update().unwrap();
        assert!(frame.report.camera_hit.is_some());
        assert!(frame.image.unwrap().max_value() > 0.0);
        assert_eq!(frame.schematic.rays.len(), 1);
        assert_eq!(frame.schematic.components.len(), 2);

        // the buffer was cleared after capture
        assert!(engine.get_image().unwrap().is_blank());
    }

    #[test]
    fn test_toggle_components() {
        let mut engine = engine();
        engine.set_laser_angles(FRAC_PI_2, 0.0).unwrap();
        engine.start();
        engine.poll_events();

        engine.turn_off(1).unwrap();
        let frame = engine.update().unwrap();
        assert!(frame.report.camera_hit.is_none());
        assert!(frame.image.unwrap().is_blank());

        engine.turn_on(1).unwrap();
        engine.turn_off(0).unwrap();
        let frame = engine.update().unwrap();
        assert!(frame.report.is_idle());
        assert!(engine.get_rays().is_empty());

        assert!(matches!(
            engine.turn_on(5),
            Err(OpticBenchError::Component(_))
        ));

        let toggles: Vec<_> = engine
            .poll_events()
            .into_iter()
            .filter(|e| matches!(e, OpticBenchEvent::ComponentToggled { .. }))
            .collect();
        assert_eq!(toggles.len(), 3);
    }

    #[test]
    fn test_laser_controls() {
        let mut engine = engine();
        engine.set_laser_power(40.0).unwrap();
        assert_eq!(engine.light_table().laser().unwrap().power(), 40.0);
        assert_eq!(
            engine.poll_events(),
            vec![OpticBenchEvent::LaserPowerChanged {
                old_power: 100.0,
                new_power: 40.0
            }]
        );

        let mut empty = SimulationEngine::from_table(LightTable::new(LightTableDesc::default()).unwrap());
        assert!(empty.set_laser_angles(0.1, 0.1).is_err());
        assert!(empty.set_laser_power(1.0).is_err());
        assert!(empty.get_image().is_none());
    }

    #[test]
    fn test_event_queue_is_bounded_without_polling() {
        let mut engine = engine();
        engine.set_laser_angles(FRAC_PI_2, 0.0).unwrap();
        engine.start();

        // two events per tick (ray emitted, camera hit)
        for _ in 0..EVENT_QUEUE_CAPACITY {
            engine.tick().unwrap();
        }
        assert_eq!(engine.event_receiver.len(), EVENT_QUEUE_CAPACITY);
        // start, angles and the first ticks' events were discarded
        assert_eq!(engine.dropped_events(), EVENT_QUEUE_CAPACITY as u64 + 2);

        let events = engine.poll_events();
        assert_eq!(events.len(), EVENT_QUEUE_CAPACITY);
        assert!(matches!(events.last(), Some(OpticBenchEvent::CameraHit { .. })));
        assert_eq!(engine.dropped_events(), 0);
        assert!(engine.poll_events().is_empty());
    }

    #[test]
    fn test_drop_does_not_queue_events() {
        let mut engine = engine();
        engine.start();
        let receiver = engine.event_receiver.clone();
        drop(engine);
        assert_eq!(receiver.try_iter().collect::<Vec<_>>(), vec![OpticBenchEvent::SimulationStarted]);
    }

    #[test]
    fn test_engine_keeps_microscope_mode() {
        let mut microscope = Microscope::new();
        microscope.set_mode("Epifluorescence").unwrap();
        let engine = SimulationEngine::new(microscope, LightTableDesc::default()).unwrap();
        assert_eq!(engine.mode(), MicroscopeMode::Epifluorescence);
        assert_eq!(engine.tick_interval(), Duration::from_millis(50));
    }
}
