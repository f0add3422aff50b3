//! Optical bench simulation of a TIRF / epifluorescence microscope.
//!
//! A [`LightTable`] holds lasers, mirrors, lenses, beam splitters, filters, objectives
//! and cameras at 3D poses. Each tick the active laser emits one ray, which is handed
//! to the other components; the camera turns intersections into Gaussian spots on
//! its sensor image. A [`SimulationEngine`] wraps the table with start/stop control,
//! a display cycle and an event queue.
//!
//! ```
//! use opticbench::components::{Camera, Laser};
//! use opticbench::math::DVec3;
//! use opticbench::{LightTableDesc, Microscope, SimulationEngine};
//!
//! let mut microscope = Microscope::new();
//! microscope.add_component(Laser::new(DVec3::new(100.0, 500.0, 0.0), DVec3::X, 488.0, 100.0)?);
//! microscope.add_component(Camera::new(DVec3::new(600.0, 500.0, 0.0), -DVec3::X)?);
//!
//! let mut engine = SimulationEngine::new(microscope, LightTableDesc::default())?;
//! engine.set_laser_angles(std::f64::consts::FRAC_PI_2, 0.0)?;
//! engine.start();
//!
//! let frame = engine.update().expect("engine is running");
//! assert!(frame.report.camera_hit.is_some());
//! # Ok::<(), opticbench::OpticBenchError>(())
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod image;
pub mod light_table;
pub mod math;
pub mod microscope;
pub mod propagation;
pub mod ray;
pub mod schematic;

pub use components::{Component, ComponentKind, OpticalComponent};
pub use config::{LightTableDesc, PropagationMode, SensorDesc};
pub use engine::{Frame, SimulationEngine};
pub use error::{DomainError, OpticBenchError};
pub use events::OpticBenchEvent;
pub use image::SensorImage;
pub use light_table::{LightTable, TickReport};
pub use microscope::{Microscope, MicroscopeMode};
pub use propagation::{ComponentFailure, PropagationOutcome};
pub use ray::Ray;
pub use schematic::{RaySegment, Schematic, SchematicFrame, ShapeKind};
