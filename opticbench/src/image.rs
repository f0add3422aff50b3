//! Camera intensity buffer.

/// Brightest value a pixel can hold.
pub const MAX_INTENSITY: f32 = 255.0;

/// Row-major 2D intensity buffer. Every value lies in `[0, MAX_INTENSITY]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorImage {
    width: usize,
    height: usize,
    pixels: Vec<f32>,
}

impl SensorImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0.0; width * height],
        }
    }

    /// An all-zero image of the same shape.
    pub fn zeros_like(other: &Self) -> Self {
        Self::new(other.width, other.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// Value at column `x`, row `y`, or `None` outside the image.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Row `y`, or `None` past the last row.
    pub fn row(&self, y: usize) -> Option<&[f32]> {
        (y < self.height).then(|| &self.pixels[y * self.width..(y + 1) * self.width])
    }

    /// Raises the pixel to `value` if it is brighter than what's stored.
    ///
    /// `value` is clamped into range first, and writes outside the image are ignored.
    pub fn blend_max(&mut self, x: usize, y: usize, value: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let pixel = &mut self.pixels[y * self.width + x];
        *pixel = pixel.max(value.clamp(0.0, MAX_INTENSITY));
    }

    pub fn max_value(&self) -> f32 {
        self.pixels.iter().copied().fold(0.0, f32::max)
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == 0.0)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0.0);
    }

    /// 8-bit grayscale copy, row-major.
    pub fn to_u8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .map(|&p| p.clamp(0.0, MAX_INTENSITY).round() as u8)
            .collect()
    }

    /// Block-averaged copy of at most `max_width` x `max_height` pixels, for thumbnails.
    pub fn downsample(&self, max_width: usize, max_height: usize) -> SensorImage {
        let step_x = self.width.div_ceil(max_width.max(1)).max(1);
        let step_y = self.height.div_ceil(max_height.max(1)).max(1);
        let width = self.width.div_ceil(step_x);
        let height = self.height.div_ceil(step_y);

        let mut out = SensorImage::new(width, height);
        for oy in 0..height {
            for ox in 0..width {
                let mut sum = 0.0;
                let mut count = 0;
                for y in (oy * step_y)..((oy + 1) * step_y).min(self.height) {
                    for x in (ox * step_x)..((ox + 1) * step_x).min(self.width) {
                        sum += self.pixels[y * self.width + x];
                        count += 1;
                    }
                }
                out.pixels[oy * width + ox] = sum / count as f32;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_max_clamps_and_keeps_brightest() {
        let mut image = SensorImage::new(4, 3);
        image.blend_max(1, 2, 100.0);
        image.blend_max(1, 2, 50.0);
        assert_eq!(image.get(1, 2), Some(100.0));

        image.blend_max(0, 0, 1000.0);
        assert_eq!(image.get(0, 0), Some(MAX_INTENSITY));

        image.blend_max(3, 0, -20.0);
        assert_eq!(image.get(3, 0), Some(0.0));

        // out of bounds writes are ignored
        image.blend_max(4, 0, 10.0);
        assert_eq!(image.get(4, 0), None);
        assert_eq!(image.max_value(), MAX_INTENSITY);
    }

    #[test]
    fn test_clear_and_zeros_like() {
        let mut image = SensorImage::new(2, 2);
        image.blend_max(1, 1, 12.0);
        assert!(!image.is_blank());
        assert!(SensorImage::zeros_like(&image).is_blank());

        image.clear();
        assert!(image.is_blank());
        assert_eq!(image.pixels().len(), 4);
    }

    #[test]
    fn test_to_u8_and_rows() {
        let mut image = SensorImage::new(3, 2);
        image.blend_max(2, 1, 254.6);
        assert_eq!(image.to_u8(), vec![0, 0, 0, 0, 0, 255]);
        assert_eq!(image.row(1), Some(&[0.0, 0.0, 254.6][..]));
        assert_eq!(image.row(2), None);
    }

    #[test]
    fn test_downsample() {
        let mut image = SensorImage::new(10, 10);
        image.blend_max(0, 0, 200.0);
        let small = image.downsample(5, 5);
        assert_eq!((small.width(), small.height()), (5, 5));
        assert_eq!(small.get(0, 0), Some(50.0));
        assert_eq!(small.get(4, 4), Some(0.0));
    }
}
