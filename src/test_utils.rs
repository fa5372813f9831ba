//! Test utilities for imageops-lab
//!
//! This module provides common functionality for testing image operations.
//! It is only compiled when running tests.

use crate::Image;
use image::Luma;

/// Creates a grayscale image where every pixel has the same value.
pub fn create_uniform_luma_image(width: u32, height: u32, value: u8) -> Image<Luma<u8>> {
    Image::from_pixel(width, height, Luma([value]))
}

/// Creates a grayscale image with a horizontal ramp plus a vertical offset.
///
/// The pattern is non-constant for any image at least 2 pixels wide or tall,
/// so edge operators always produce a non-zero response.
pub fn create_gradient_luma_image(width: u32, height: u32) -> Image<Luma<u8>> {
    Image::from_fn(width, height, |x, y| {
        Luma([((x * 255 / width.max(1)) + y * 3).min(255) as u8])
    })
}

/// Creates a grayscale checkerboard with two alternating intensities.
pub fn create_checkerboard_luma_image(width: u32, height: u32, dark: u8, light: u8) -> Image<Luma<u8>> {
    Image::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Luma([dark])
        } else {
            Luma([light])
        }
    })
}

/// Compares two images pixel by pixel with a tolerance for rounding errors.
///
/// # Returns
/// `true` if all pixels are within tolerance and dimensions match, `false` otherwise
pub fn images_approx_equal(expected: &Image<Luma<u8>>, actual: &Image<Luma<u8>>, tolerance: u8) -> bool {
    if expected.dimensions() != actual.dimensions() {
        return false;
    }

    expected
        .pixels()
        .zip(actual.pixels())
        .all(|(e, a)| e[0].abs_diff(a[0]) <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_uniform_luma_image_fills_every_pixel() {
        let image = create_uniform_luma_image(3, 2, 77);
        assert_eq!(image.dimensions(), (3, 2));
        assert!(image.pixels().all(|p| p[0] == 77));
    }

    #[test]
    fn create_gradient_luma_image_is_not_constant() {
        let image = create_gradient_luma_image(4, 4);
        assert_ne!(image.get_pixel(0, 0), image.get_pixel(3, 3));
    }

    #[test]
    fn create_checkerboard_luma_image_alternates() {
        let image = create_checkerboard_luma_image(2, 2, 10, 200);
        assert_eq!(image.get_pixel(0, 0), &Luma([10]));
        assert_eq!(image.get_pixel(1, 0), &Luma([200]));
        assert_eq!(image.get_pixel(0, 1), &Luma([200]));
        assert_eq!(image.get_pixel(1, 1), &Luma([10]));
    }

    #[test]
    fn images_approx_equal_with_tolerant_comparison_returns_true() {
        let image1 = create_uniform_luma_image(2, 2, 100);
        let mut image2 = image1.clone();
        image2.put_pixel(0, 0, Luma([101]));

        assert!(images_approx_equal(&image1, &image2, 1));
        assert!(!images_approx_equal(&image1, &image2, 0));
    }
}
