use super::{ComponentBase, ComponentKind, OpticalComponent};
use crate::config::SensorDesc;
use crate::error::{DomainError, Result};
use crate::image::{MAX_INTENSITY, SensorImage};
use crate::math::{DVec2, DVec3};
use crate::ray::Ray;

/// Rays closer to parallel with the sensor plane than this never hit it.
const PARALLEL_EPSILON: f64 = 1e-6;

/// Schematic extent of a camera body.
const SCHEMATIC_SIZE: DVec2 = DVec2::new(100.0, 100.0);

/// Camera sensor that accumulates diffraction spots where rays hit it.
///
/// The sensor plane passes through the camera's position with the orientation as
/// its normal. Its pixel grid starts at the position and runs along
/// [`Camera::local_x`] and [`Camera::local_y`]; there's no centring.
///
/// Spots are combined with the elementwise maximum, so the image never exceeds
/// [`MAX_INTENSITY`] and hitting the same pixel twice changes nothing. The buffer
/// keeps accumulating across ticks until [`Camera::clear_image`] is called.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    base: ComponentBase,
    desc: SensorDesc,
    image: SensorImage,
    hit_count: u64,
    last_hit: Option<DVec2>,
}

impl Camera {
    /// Camera with the default 1000x1000 sensor.
    pub fn new(position: DVec3, orientation: DVec3) -> Result<Self> {
        Self::with_sensor(position, orientation, SensorDesc::default())
    }

    pub fn with_sensor(position: DVec3, orientation: DVec3, desc: SensorDesc) -> Result<Self> {
        desc.validate()?;
        let (width, height) = desc.sensor_size;
        Ok(Self {
            base: ComponentBase::new(position, orientation)?.with_size(SCHEMATIC_SIZE),
            image: SensorImage::new(width, height),
            desc,
            hit_count: 0,
            last_hit: None,
        })
    }

    pub fn sensor(&self) -> &SensorDesc {
        &self.desc
    }

    /// Number of rays that landed on the sensor since construction.
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    /// Pixel coordinates of the most recent hit.
    pub fn last_hit(&self) -> Option<DVec2> {
        self.last_hit
    }

    /// Sensor axis along the pixel columns: `orientation × z`.
    ///
    /// Not normalized, so a camera tilted out of the xy plane scales its x pixel
    /// coordinates by `|orientation × z|`.
    pub fn local_x(&self) -> std::result::Result<DVec3, DomainError> {
        let axis = self.base.orientation.cross(DVec3::Z);
        if axis == DVec3::ZERO {
            return Err(DomainError::DegenerateBasis);
        }
        Ok(axis)
    }

    /// `local_x × orientation`
    pub fn local_y(&self) -> std::result::Result<DVec3, DomainError> {
        Ok(self.local_x()?.cross(self.base.orientation))
    }

    /// Intersects `ray` with the sensor plane and returns the continuous pixel
    /// coordinates of the hit.
    ///
    /// # Errors
    ///
    /// * [`DomainError::ParallelToPlane`] if the ray runs along the plane
    /// * [`DomainError::OutOfRange`] if the plane is behind the ray or past its end
    /// * [`DomainError::OffSensor`] if the hit falls outside the pixel grid
    /// * [`DomainError::DegenerateBasis`] if the camera faces along z
    pub fn ray_intersection(&self, ray: &Ray) -> std::result::Result<DVec2, DomainError> {
        let normal = self.base.orientation;
        let plane_point = self.base.position;

        let denominator = normal.dot(ray.direction());
        if denominator.abs() <= PARALLEL_EPSILON {
            return Err(DomainError::ParallelToPlane);
        }

        let t = normal.dot(plane_point - ray.origin()) / denominator;
        if !(0.0..=ray.length()).contains(&t) {
            return Err(DomainError::OutOfRange {
                t,
                length: ray.length(),
            });
        }

        let offset = ray.point_at(t) - plane_point;
        let pixel = DVec2::new(
            offset.dot(self.local_x()?),
            offset.dot(self.local_y()?),
        ) / self.desc.pixel_size;
        log::trace!("Ray meets camera plane at t = {} (pixel {:?})", t, pixel);

        let (width, height) = self.desc.sensor_size;
        if (0.0..width as f64).contains(&pixel.x) && (0.0..height as f64).contains(&pixel.y) {
            Ok(pixel)
        } else {
            Err(DomainError::OffSensor {
                x: pixel.x,
                y: pixel.y,
            })
        }
    }

    /// Writes a Gaussian spot centred on `(x, y)` into the image.
    ///
    /// The spot is evaluated on the integer window of `spot_radius` pixels around
    /// `(floor(x), floor(y))`, clipped to the sensor, and scaled so its brightest
    /// pixel is [`MAX_INTENSITY`].
    pub fn add_diffraction_spot(&mut self, x: f64, y: f64) {
        let (width, height) = self.desc.sensor_size;
        let radius = self.desc.spot_radius as i64;
        let sigma = self.desc.spot_sigma;

        let (cx, cy) = (x.floor() as i64, y.floor() as i64);
        let x_range = (cx - radius).max(0)..(cx + radius + 1).min(width as i64);
        let y_range = (cy - radius).max(0)..(cy + radius + 1).min(height as i64);
        if x_range.is_empty() || y_range.is_empty() {
            return;
        }

        let patch_width = (x_range.end - x_range.start) as usize;
        let mut patch = Vec::with_capacity(patch_width * (y_range.end - y_range.start) as usize);
        for j in y_range.clone() {
            for i in x_range.clone() {
                let (dx, dy) = (i as f64 - x, j as f64 - y);
                patch.push((-(dx * dx + dy * dy) / (2.0 * sigma)).exp());
            }
        }

        let peak = patch.iter().copied().fold(0.0, f64::max);
        if peak <= 0.0 {
            return;
        }
        let scale = MAX_INTENSITY as f64 / peak;

        for (row, j) in y_range.enumerate() {
            for (col, i) in x_range.clone().enumerate() {
                let value = (patch[row * patch_width + col] * scale) as f32;
                self.image.blend_max(i as usize, j as usize, value);
            }
        }
        log::trace!("Added diffraction spot at ({:.2}, {:.2})", x, y);
    }

    /// A snapshot of the image, or an all-zero image of the same shape when the
    /// camera is off.
    pub fn get_image(&self) -> SensorImage {
        if self.base.is_on {
            self.image.clone()
        } else {
            SensorImage::zeros_like(&self.image)
        }
    }

    /// The accumulated buffer, regardless of the on/off state.
    pub fn image(&self) -> &SensorImage {
        &self.image
    }

    pub fn clear_image(&mut self) {
        self.image.clear();
    }
}

impl OpticalComponent for Camera {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Camera
    }

    /// Terminal: records a spot on a hit and never emits rays.
    fn interact_with_light(&mut self, ray: &Ray) -> std::result::Result<Vec<Ray>, DomainError> {
        if !self.base.is_on {
            return Ok(Vec::new());
        }

        match self.ray_intersection(ray) {
            Ok(pixel) => {
                log::debug!(
                    "Ray intersected camera at pixel coordinates: ({:.2}, {:.2})",
                    pixel.x,
                    pixel.y
                );
                self.add_diffraction_spot(pixel.x, pixel.y);
                self.hit_count += 1;
                self.last_hit = Some(pixel);
            }
            Err(miss) => log::debug!("Ray did not hit the camera sensor: {}", miss),
        }
        Ok(Vec::new())
    }
}
