//! Internal utility functions for imageops-lab.
//!
//! This module contains common functionality used across different image operations.

use crate::error::Error;

/// Clamps a floating-point value to [0, 255] and narrows it to `u8`.
///
/// The fractional part is truncated toward zero after clamping, so
/// `127.9` becomes `127`. NaN maps to `0`.
///
/// # Arguments
///
/// * `value` - The floating-point value to clamp
///
/// # Returns
///
/// The clamped value as an 8-bit sample
#[inline]
pub fn clamp_f64_to_u8(value: f64) -> u8 {
    // `as` saturates on overflow and maps NaN to 0
    value.clamp(0.0, 255.0) as u8
}

/// Rounds a floating-point value to the nearest integer, then clamps to [0, 255].
#[inline]
pub fn round_f64_to_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Validates that an image has non-zero dimensions.
///
/// # Arguments
///
/// * `width` - The width of the image
/// * `height` - The height of the image
/// * `context` - A description of the context for error messages
///
/// # Returns
///
/// `Ok(())` if the dimensions are valid, otherwise `Error::InvalidInput`
pub fn validate_non_empty_image(width: u32, height: u32, context: &str) -> Result<(), Error> {
    if width == 0 || height == 0 {
        Err(Error::InvalidInput(format!(
            "{}: Image dimensions must be non-zero, got {}x{}",
            context, width, height
        )))
    } else {
        Ok(())
    }
}

/// Validates that two images have matching dimensions.
///
/// # Returns
///
/// `Ok(())` if the dimensions match, otherwise `Error::DimensionMismatch`
pub fn validate_matching_dimensions(expected: (u32, u32), actual: (u32, u32)) -> Result<(), Error> {
    if expected != actual {
        Err(Error::DimensionMismatch { expected, actual })
    } else {
        Ok(())
    }
}

/// Validates that a noise parameter is finite and non-negative.
pub fn validate_non_negative(value: f64, name: &str) -> Result<(), Error> {
    if !value.is_finite() || value < 0.0 {
        Err(Error::InvalidParameter(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )))
    } else {
        Ok(())
    }
}
