use anyhow::{Context, Result, bail};
use opticbench::components::{Camera, Filter, Laser, PassBand};
use opticbench::math::DVec3;
use opticbench::{LightTableDesc, Microscope, PropagationMode, SensorImage, SimulationEngine};
use std::f64::consts::FRAC_PI_2;

const THUMBNAIL_SIZE: (usize, usize) = (50, 25);
const SHADES: &[u8] = b" .:-=+*#%@";

#[derive(Debug, Clone)]
pub struct Options {
    pub ticks: usize,
    pub chained: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ticks: 20,
            chained: false,
        }
    }
}

impl Options {
    /// Parses `--ticks N` and `--chained`.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--ticks" => {
                    let value = args.next().context("--ticks needs a value")?;
                    options.ticks = value
                        .parse()
                        .with_context(|| format!("invalid tick count '{}'", value))?;
                }
                "--chained" => options.chained = true,
                other => bail!("unknown argument '{}'", other),
            }
        }
        Ok(options)
    }
}

pub fn run(options: &Options) -> Result<()> {
    let mut microscope = Microscope::new();
    microscope.set_mode("TIRF")?;
    microscope.add_component(Laser::new(
        DVec3::new(100.0, 500.0, 0.0),
        DVec3::X,
        488.0,
        100.0,
    )?);
    microscope.add_component(Filter::new(
        DVec3::new(300.0, 500.0, 0.0),
        DVec3::X,
        PassBand::LINE_488,
    )?);
    microscope.add_component(Camera::new(DVec3::new(600.0, 500.0, 0.0), -DVec3::X)?);

    let desc = LightTableDesc {
        propagation: if options.chained {
            PropagationMode::Chained
        } else {
            PropagationMode::Broadcast
        },
        ..Default::default()
    };
    log::info!(
        "Running {} ticks in {:?} mode ({} microscope)",
        options.ticks,
        desc.propagation,
        microscope.mode()
    );

    let mut engine = SimulationEngine::new(microscope, desc)?;
    engine.set_laser_angles(FRAC_PI_2, 0.0)?;
    engine.start();

    let mut last_image = None;
    for tick in 0..options.ticks {
        let Some(frame) = engine.update() else {
            break;
        };
        for failure in &frame.report.failures {
            log::warn!("{} #{} failed: {}", failure.kind, failure.index, failure.error);
        }
        if let Some(image) = &frame.image {
            log::info!(
                "Tick {}: {} rays, max intensity {}",
                tick,
                frame.report.ray_count,
                image.max_value()
            );
        }
        last_image = frame.image;
        std::thread::sleep(engine.tick_interval());
    }

    for event in engine.poll_events().iter().filter(|e| e.is_control_event()) {
        log::debug!("{:?}", event);
    }
    engine.stop();

    if let Some(image) = last_image {
        println!("{}", thumbnail(&image));
    }
    Ok(())
}

fn thumbnail(image: &SensorImage) -> String {
    let small = image.downsample(THUMBNAIL_SIZE.0, THUMBNAIL_SIZE.1);
    let max = small.max_value();
    let mut out = String::with_capacity((small.width() + 1) * small.height());

    for y in 0..small.height() {
        for &value in small.row(y).unwrap_or_default() {
            let level = if max > 0.0 {
                ((value / max) * (SHADES.len() - 1) as f32).round() as usize
            } else {
                0
            };
            out.push(SHADES[level.min(SHADES.len() - 1)] as char);
        }
        out.push('\n');
    }
    out
}
