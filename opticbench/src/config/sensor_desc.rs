use crate::error::{OpticBenchError, Result};

/// Configuration descriptor for a camera sensor
#[derive(Debug, Clone, PartialEq)]
pub struct SensorDesc {
    /// Sensor dimensions in pixels, `(width, height)`
    pub sensor_size: (usize, usize),
    /// Physical size of one pixel, in bench units
    pub pixel_size: f64,
    /// Variance of the Gaussian used for diffraction spots, in pixels squared
    pub spot_sigma: f64,
    /// Half-width of the square window a diffraction spot is evaluated over, in pixels
    pub spot_radius: usize,
}

impl Default for SensorDesc {
    fn default() -> Self {
        Self {
            sensor_size: (1000, 1000),
            pixel_size: 1.0,
            spot_sigma: 5.0,
            spot_radius: 20,
        }
    }
}

impl SensorDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensor_size(mut self, width: usize, height: usize) -> Self {
        self.sensor_size = (width, height);
        self
    }

    pub fn pixel_size(mut self, size: f64) -> Self {
        self.pixel_size = size;
        self
    }

    pub fn spot_sigma(mut self, sigma: f64) -> Self {
        self.spot_sigma = sigma;
        self
    }

    pub fn spot_radius(mut self, radius: usize) -> Self {
        self.spot_radius = radius;
        self
    }

    /// Checks that the descriptor describes a usable sensor.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.sensor_size;
        if width == 0 || height == 0 {
            return Err(OpticBenchError::Configuration(format!(
                "sensor size must be non-zero, got {}x{}",
                width, height
            )));
        }
        if !(self.pixel_size > 0.0) {
            return Err(OpticBenchError::Configuration(format!(
                "pixel size must be positive, got {}",
                self.pixel_size
            )));
        }
        if !(self.spot_sigma > 0.0) {
            return Err(OpticBenchError::Configuration(format!(
                "spot sigma must be positive, got {}",
                self.spot_sigma
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let desc = SensorDesc::default();
        assert_eq!(desc.sensor_size, (1000, 1000));
        assert_eq!(desc.pixel_size, 1.0);
        assert!(desc.validate().is_ok());
    }

    #[test]
    fn test_builder_and_validation() {
        let desc = SensorDesc::new().sensor_size(64, 32).pixel_size(0.5);
        assert_eq!(desc.sensor_size, (64, 32));
        assert!(desc.validate().is_ok());

        assert!(SensorDesc::new().sensor_size(0, 10).validate().is_err());
        assert!(SensorDesc::new().pixel_size(0.0).validate().is_err());
        assert!(SensorDesc::new().spot_sigma(-1.0).validate().is_err());
    }
}
