use crate::error::Error;
use crate::utils::{validate_matching_dimensions, validate_non_empty_image};
use crate::Image;
use image::Luma;

/// Mean squared error between two grayscale images of equal shape
///
/// Both operands are promoted to `f64` before subtraction, so there is no
/// unsigned underflow. The metric is symmetric and is exactly `0.0` for
/// identical images.
///
/// # Errors
///
/// * `Error::InvalidInput` - the reference is empty
/// * `Error::DimensionMismatch` - the two images differ in shape
///
/// # Examples
///
/// ```
/// use image::{GrayImage, Luma};
/// use imageops_lab::mean_squared_error;
///
/// let a = GrayImage::from_pixel(2, 2, Luma([10]));
/// let b = GrayImage::from_pixel(2, 2, Luma([13]));
/// assert_eq!(mean_squared_error(&a, &b).unwrap(), 9.0);
/// ```
pub fn mean_squared_error(
    reference: &Image<Luma<u8>>,
    candidate: &Image<Luma<u8>>,
) -> Result<f64, Error> {
    let (width, height) = reference.dimensions();
    validate_non_empty_image(width, height, "MSE")?;
    validate_matching_dimensions(reference.dimensions(), candidate.dimensions())?;

    let sum: f64 = reference
        .as_raw()
        .iter()
        .zip(candidate.as_raw().iter())
        .map(|(&r, &c)| {
            let diff = f64::from(r) - f64::from(c);
            diff * diff
        })
        .sum();

    Ok(sum / reference.as_raw().len() as f64)
}
