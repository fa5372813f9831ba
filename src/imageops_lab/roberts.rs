use crate::error::Error;
use crate::utils::{clamp_f64_to_u8, validate_non_empty_image};
use crate::Image;
use image::{ImageBuffer, Luma};
use itertools::iproduct;

/// Roberts Cross edge detection for grayscale images
///
/// The operator takes two diagonal differences over every 2x2 window:
///
/// ```text
/// Gx = P(x, y)     - P(x+1, y+1)
/// Gy = P(x+1, y)   - P(x, y+1)
/// ```
///
/// and reports `sqrt(Gx² + Gy²)`. The forward differences make the
/// response one pixel smaller than the input in each direction.
pub trait RobertsCross {
    /// Raw gradient magnitude field of size `(W-1) x (H-1)`
    ///
    /// No normalization is applied; values range over `[0, 255·√2]`.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidInput` - the image has zero width or height
    fn roberts_gradient(&self) -> Result<Image<Luma<f32>>, Error>;

    /// Edge map with the same dimensions as the input
    ///
    /// The magnitude field is min-max stretched so that its maximum maps
    /// to 255, then written into the top-left `(W-1) x (H-1)` region of a
    /// zeroed 8-bit image. The last row and last column stay 0. A constant
    /// image has no gradient and yields an all-zero result.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidInput` - the image has zero width or height
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{GrayImage, Luma};
    /// use imageops_lab::RobertsCross;
    ///
    /// let mut image = GrayImage::new(2, 2);
    /// image.put_pixel(1, 1, Luma([255]));
    ///
    /// let edges = image.roberts_cross().unwrap();
    /// assert_eq!(edges.get_pixel(0, 0), &Luma([255]));
    /// assert_eq!(edges.get_pixel(1, 1), &Luma([0]));
    /// ```
    fn roberts_cross(&self) -> Result<Image<Luma<u8>>, Error>;
}

impl RobertsCross for Image<Luma<u8>> {
    fn roberts_gradient(&self) -> Result<Image<Luma<f32>>, Error> {
        let field = GradientField::compute(self)?;
        let mut output = ImageBuffer::new(field.width, field.height);
        for (pixel, &magnitude) in output.pixels_mut().zip(field.magnitudes.iter()) {
            *pixel = Luma([magnitude as f32]);
        }
        Ok(output)
    }

    fn roberts_cross(&self) -> Result<Image<Luma<u8>>, Error> {
        let field = GradientField::compute(self)?;
        let (width, height) = self.dimensions();

        let max_val = field.max();

        // The output buffer is u8 from the start; the stretched field is
        // narrowed sample by sample before it is written.
        let mut output: Image<Luma<u8>> = ImageBuffer::new(width, height);
        for (y, x) in iproduct!(0..field.height, 0..field.width) {
            let magnitude = field.get(x, y);
            let stretched = if max_val > 0.0 {
                magnitude / max_val * 255.0
            } else {
                magnitude
            };
            output.put_pixel(x, y, Luma([clamp_f64_to_u8(stretched)]));
        }

        tracing::debug!(width, height, max_val, "roberts cross computed");
        Ok(output)
    }
}

/// Gradient magnitudes over the `(W-1) x (H-1)` forward-difference region
struct GradientField {
    magnitudes: Vec<f64>,
    width: u32,
    height: u32,
}

impl GradientField {
    fn compute(image: &Image<Luma<u8>>) -> Result<Self, Error> {
        let (width, height) = image.dimensions();
        validate_non_empty_image(width, height, "Roberts Cross")?;

        let field_width = width - 1;
        let field_height = height - 1;
        let sample = |x: u32, y: u32| i32::from(image.get_pixel(x, y)[0]);

        let magnitudes = iproduct!(0..field_height, 0..field_width)
            .map(|(y, x)| {
                let gx = sample(x, y) - sample(x + 1, y + 1);
                let gy = sample(x + 1, y) - sample(x, y + 1);
                f64::from(gx * gx + gy * gy).sqrt()
            })
            .collect();

        Ok(Self {
            magnitudes,
            width: field_width,
            height: field_height,
        })
    }

    fn get(&self, x: u32, y: u32) -> f64 {
        self.magnitudes[(y * self.width + x) as usize]
    }

    fn max(&self) -> f64 {
        self.magnitudes.iter().copied().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_gradient_luma_image, create_uniform_luma_image};

    #[test]
    fn roberts_cross_with_uniform_image_returns_all_zero() {
        let image = create_uniform_luma_image(4, 4, 100);
        let edges = image.roberts_cross().unwrap();

        assert_eq!(edges.dimensions(), (4, 4));
        assert!(edges.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn roberts_cross_with_single_bright_corner_detects_diagonal() {
        let image: Image<Luma<u8>> = ImageBuffer::from_raw(2, 2, vec![0, 0, 0, 255]).unwrap();
        let edges = image.roberts_cross().unwrap();

        assert_eq!(edges.into_raw(), vec![255, 0, 0, 0]);
    }

    #[test]
    fn roberts_cross_stretches_weak_response_to_full_range() {
        // Step of 10 between columns 1 and 2
        let mut image = create_uniform_luma_image(3, 3, 50);
        for y in 0..3 {
            image.put_pixel(2, y, Luma([60]));
        }
        let edges = image.roberts_cross().unwrap();

        assert_eq!(edges.get_pixel(0, 0), &Luma([0]));
        assert_eq!(edges.get_pixel(1, 0), &Luma([255]));
        assert_eq!(edges.get_pixel(1, 1), &Luma([255]));
    }

    #[test]
    fn roberts_cross_keeps_last_row_and_column_zero() {
        let image = create_gradient_luma_image(8, 6);
        let edges = image.roberts_cross().unwrap();

        assert_eq!(edges.dimensions(), (8, 6));
        for x in 0..8 {
            assert_eq!(edges.get_pixel(x, 5), &Luma([0]));
        }
        for y in 0..6 {
            assert_eq!(edges.get_pixel(7, y), &Luma([0]));
        }
        assert!(edges.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn roberts_cross_with_single_row_returns_zero_image() {
        let image: Image<Luma<u8>> = ImageBuffer::from_raw(3, 1, vec![0, 128, 255]).unwrap();
        let edges = image.roberts_cross().unwrap();

        assert_eq!(edges.dimensions(), (3, 1));
        assert!(edges.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn roberts_cross_with_empty_image_returns_error() {
        let image: Image<Luma<u8>> = ImageBuffer::new(0, 5);
        assert!(matches!(
            image.roberts_cross(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn roberts_gradient_reports_unstretched_magnitude() {
        let image: Image<Luma<u8>> = ImageBuffer::from_raw(2, 2, vec![10, 0, 0, 0]).unwrap();
        let gradient = image.roberts_gradient().unwrap();

        assert_eq!(gradient.dimensions(), (1, 1));
        assert!((gradient.get_pixel(0, 0)[0] - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn roberts_gradient_combines_both_diagonals() {
        let image: Image<Luma<u8>> = ImageBuffer::from_raw(2, 2, vec![40, 30, 0, 0]).unwrap();
        let gradient = image.roberts_gradient().unwrap();

        // Gx = 40 - 0, Gy = 30 - 0
        assert!((gradient.get_pixel(0, 0)[0] - 50.0).abs() < 1e-4);
    }
}
