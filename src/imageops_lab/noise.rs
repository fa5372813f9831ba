use crate::error::Error;
use crate::utils::{clamp_f64_to_u8, validate_non_empty_image, validate_non_negative};
use crate::Image;
use image::{ImageBuffer, Luma};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, StandardNormal};
use serde::Serialize;

/// Synthetic degradation applied to a grayscale reference image
///
/// All Gaussian families add noise in floating point, clamp the result to
/// `[0, 255]` and truncate back to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum NoiseSpec {
    /// i.i.d. Gaussian noise with the given mean and variance
    Additive { mean: f64, variance: f64 },

    /// Salt-and-pepper noise
    ///
    /// `density` is the fraction of pixels hit. Half of the hits are set
    /// to 255 and half to 0; the two position sets are drawn
    /// independently and may overlap, in which case pepper wins.
    Impulse { density: f64 },

    /// Zero-mean Gaussian noise whose variance grows with brightness:
    /// `base_variance + gain * value`
    BrightnessDependent { base_variance: f64, gain: f64 },

    /// Zero-mean Gaussian noise whose variance grows linearly from 0 at the
    /// left column to `max_variance` at the right column
    CoordinateDependent { max_variance: f64 },
}

impl NoiseSpec {
    /// Base variance used by the brightness-dependent generator when none is given.
    pub const DEFAULT_BASE_VARIANCE: f64 = 5.0;

    /// Zero-mean additive Gaussian noise
    #[must_use]
    pub const fn additive(variance: f64) -> Self {
        Self::Additive {
            mean: 0.0,
            variance,
        }
    }

    #[must_use]
    pub const fn impulse(density: f64) -> Self {
        Self::Impulse { density }
    }

    /// Brightness-dependent noise with the default base variance
    #[must_use]
    pub const fn brightness_dependent(gain: f64) -> Self {
        Self::BrightnessDependent {
            base_variance: Self::DEFAULT_BASE_VARIANCE,
            gain,
        }
    }

    #[must_use]
    pub const fn coordinate_dependent(max_variance: f64) -> Self {
        Self::CoordinateDependent { max_variance }
    }

    /// Checks that every parameter is usable before any sampling happens.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - a variance or gain is negative or not
    ///   finite, the mean is not finite, or the density is outside `[0, 1]`
    pub fn validate(&self) -> Result<(), Error> {
        match *self {
            Self::Additive { mean, variance } => {
                if !mean.is_finite() {
                    return Err(Error::InvalidParameter(format!(
                        "mean must be finite, got {}",
                        mean
                    )));
                }
                validate_non_negative(variance, "variance")
            }
            Self::Impulse { density } => {
                if (0.0..=1.0).contains(&density) {
                    Ok(())
                } else {
                    Err(Error::InvalidParameter(format!(
                        "density must be within [0, 1], got {}",
                        density
                    )))
                }
            }
            Self::BrightnessDependent {
                base_variance,
                gain,
            } => {
                validate_non_negative(base_variance, "base variance")?;
                validate_non_negative(gain, "gain")
            }
            Self::CoordinateDependent { max_variance } => {
                validate_non_negative(max_variance, "max variance")
            }
        }
    }
}

/// Trait for degrading a grayscale image with synthetic noise
pub trait AddNoise {
    /// Applies `spec` using the supplied random source
    ///
    /// The result always has the dimensions of `self`.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidInput` - the image has zero width or height
    /// * `Error::InvalidParameter` - `spec` fails [`NoiseSpec::validate`]
    fn add_noise<R: Rng + ?Sized>(
        &self,
        spec: &NoiseSpec,
        rng: &mut R,
    ) -> Result<Image<Luma<u8>>, Error>;

    /// Applies `spec` with a freshly seeded generator
    ///
    /// The same seed always reproduces the same output.
    ///
    /// # Errors
    ///
    /// See [`AddNoise::add_noise`].
    fn add_noise_seeded(&self, spec: &NoiseSpec, seed: u64) -> Result<Image<Luma<u8>>, Error> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.add_noise(spec, &mut rng)
    }
}

impl AddNoise for Image<Luma<u8>> {
    fn add_noise<R: Rng + ?Sized>(
        &self,
        spec: &NoiseSpec,
        rng: &mut R,
    ) -> Result<Image<Luma<u8>>, Error> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height, "Noise synthesis")?;
        spec.validate()?;

        let output = match *spec {
            NoiseSpec::Additive { mean, variance } => {
                let normal = Normal::new(mean, variance.sqrt())
                    .map_err(|e| Error::InvalidParameter(e.to_string()))?;
                map_with_noise(self, |_, _, _| normal.sample(rng))
            }
            NoiseSpec::Impulse { density } => apply_impulse(self, density, rng),
            NoiseSpec::BrightnessDependent {
                base_variance,
                gain,
            } => map_with_noise(self, |_, _, value| {
                let normalized = f64::from(value) / 255.0;
                let sigma = (base_variance + gain * normalized * 255.0).sqrt();
                let z: f64 = StandardNormal.sample(rng);
                sigma * z
            }),
            NoiseSpec::CoordinateDependent { max_variance } => {
                let variance_at = column_variance(width, max_variance);
                map_with_noise(self, |x, _, _| {
                    let z: f64 = StandardNormal.sample(rng);
                    variance_at(x).sqrt() * z
                })
            }
        };

        tracing::debug!(?spec, width, height, "noise applied");
        Ok(output)
    }
}

/// Adds a per-pixel noise term in row-major order, then clamps and truncates.
fn map_with_noise<F>(image: &Image<Luma<u8>>, mut noise: F) -> Image<Luma<u8>>
where
    F: FnMut(u32, u32, u8) -> f64,
{
    let (width, height) = image.dimensions();
    let mut output = ImageBuffer::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let value = pixel[0];
        let noisy = f64::from(value) + noise(x, y, value);
        output.put_pixel(x, y, Luma([clamp_f64_to_u8(noisy)]));
    }
    output
}

/// Linear variance ramp: 0 at column 0, `max_variance` at column `width - 1`.
fn column_variance(width: u32, max_variance: f64) -> impl Fn(u32) -> f64 {
    let last = f64::from(width.saturating_sub(1));
    move |x| {
        if last == 0.0 {
            0.0
        } else {
            max_variance * f64::from(x) / last
        }
    }
}

fn apply_impulse<R: Rng + ?Sized>(
    image: &Image<Luma<u8>>,
    density: f64,
    rng: &mut R,
) -> Image<Luma<u8>> {
    let total = image.as_raw().len();
    // Truncation matches the integer pixel count of the hit fraction.
    let hits = (total as f64 * density) as usize;
    let per_kind = (hits / 2).min(total);

    let mut output = image.clone();
    let salt = index::sample(rng, total, per_kind);
    let pepper = index::sample(rng, total, per_kind);

    let samples: &mut [u8] = &mut output;
    for i in salt.iter() {
        samples[i] = 255;
    }
    for i in pepper.iter() {
        samples[i] = 0;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_gradient_luma_image, create_uniform_luma_image};

    fn sample_variance<I: IntoIterator<Item = u8>>(values: I) -> f64 {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
    }

    fn column_of(image: &Image<Luma<u8>>, x: u32) -> Vec<u8> {
        (0..image.height()).map(|y| image.get_pixel(x, y)[0]).collect()
    }

    #[test]
    fn additive_noise_has_requested_variance() {
        let image = create_uniform_luma_image(128, 128, 128);
        let noisy = image
            .add_noise_seeded(&NoiseSpec::additive(100.0), 2024)
            .unwrap();
        let variance = sample_variance(noisy.pixels().map(|p| p[0]));
        assert!((85.0..=115.0).contains(&variance), "variance = {variance}");
    }

    #[test]
    fn brightness_dependent_variance_follows_pixel_value() {
        let spec = NoiseSpec::brightness_dependent(0.3);
        // base 5 + 0.3 * value
        for (value, expected) in [(40u8, 17.0), (200u8, 65.0)] {
            let image = create_uniform_luma_image(128, 128, value);
            let noisy = image.add_noise_seeded(&spec, 31).unwrap();
            let variance = sample_variance(noisy.pixels().map(|p| p[0]));
            assert!(
                (variance - expected).abs() <= expected * 0.15,
                "value {value}: variance = {variance}, expected {expected}"
            );
        }
    }

    #[test]
    fn coordinate_dependent_variance_ramps_across_columns() {
        let image = create_uniform_luma_image(16, 4096, 128);
        let noisy = image
            .add_noise_seeded(&NoiseSpec::coordinate_dependent(300.0), 17)
            .unwrap();

        assert_eq!(sample_variance(column_of(&noisy, 0)), 0.0);

        let middle = sample_variance(column_of(&noisy, 8));
        assert!((136.0..=184.0).contains(&middle), "middle = {middle}");

        let last = sample_variance(column_of(&noisy, 15));
        assert!((255.0..=345.0).contains(&last), "last = {last}");
    }

    #[test]
    fn additive_with_zero_variance_is_identity() {
        let image = create_gradient_luma_image(16, 16);
        let noisy = image
            .add_noise_seeded(&NoiseSpec::additive(0.0), 7)
            .unwrap();
        assert_eq!(noisy, image);
    }

    #[test]
    fn additive_with_positive_mean_shifts_values() {
        let image = create_uniform_luma_image(4, 4, 100);
        let spec = NoiseSpec::Additive {
            mean: 20.0,
            variance: 0.0,
        };
        let noisy = image.add_noise_seeded(&spec, 1).unwrap();
        assert!(noisy.pixels().all(|p| p[0] == 120));
    }

    #[test]
    fn additive_noise_clamps_at_both_ends() {
        let mut image = create_uniform_luma_image(32, 32, 0);
        for x in 0..32 {
            image.put_pixel(x, 0, Luma([255]));
        }
        let noisy = image
            .add_noise_seeded(&NoiseSpec::additive(10_000.0), 3)
            .unwrap();
        assert_eq!(noisy.dimensions(), (32, 32));
        // Huge variance drives many samples to both rails
        assert!(noisy.pixels().any(|p| p[0] == 0));
        assert!(noisy.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn same_seed_reproduces_output() {
        let image = create_gradient_luma_image(20, 20);
        let spec = NoiseSpec::brightness_dependent(0.3);
        let a = image.add_noise_seeded(&spec, 42).unwrap();
        let b = image.add_noise_seeded(&spec, 42).unwrap();
        let c = image.add_noise_seeded(&spec, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn impulse_sets_expected_number_of_salt_pixels() {
        let image = create_uniform_luma_image(100, 100, 128);
        let noisy = image
            .add_noise_seeded(&NoiseSpec::impulse(0.10), 11)
            .unwrap();

        let salt = noisy.pixels().filter(|p| p[0] == 255).count();
        let pepper = noisy.pixels().filter(|p| p[0] == 0).count();
        let untouched = noisy.pixels().filter(|p| p[0] == 128).count();

        // 1000 hits, 500 of each kind; overlaps convert salt into pepper
        assert!((400..=500).contains(&salt), "salt = {salt}");
        assert_eq!(pepper, 500);
        assert_eq!(salt + pepper + untouched, 10_000);
    }

    #[test]
    fn impulse_with_zero_density_is_identity() {
        let image = create_gradient_luma_image(10, 10);
        let noisy = image.add_noise_seeded(&NoiseSpec::impulse(0.0), 5).unwrap();
        assert_eq!(noisy, image);
    }

    #[test]
    fn coordinate_dependent_leaves_first_column_untouched() {
        let image = create_uniform_luma_image(16, 16, 128);
        let noisy = image
            .add_noise_seeded(&NoiseSpec::coordinate_dependent(300.0), 9)
            .unwrap();
        for y in 0..16 {
            assert_eq!(noisy.get_pixel(0, y), &Luma([128]));
        }
        assert!((0..16).any(|y| noisy.get_pixel(15, y)[0] != 128));
    }

    #[test]
    fn coordinate_dependent_with_single_column_is_identity() {
        let image = create_uniform_luma_image(1, 8, 60);
        let noisy = image
            .add_noise_seeded(&NoiseSpec::coordinate_dependent(300.0), 9)
            .unwrap();
        assert_eq!(noisy, image);
    }

    #[test]
    fn column_variance_interpolates_linearly() {
        let variance_at = column_variance(5, 100.0);
        assert_eq!(variance_at(0), 0.0);
        assert_eq!(variance_at(2), 50.0);
        assert_eq!(variance_at(4), 100.0);
    }

    #[test]
    fn brightness_dependent_perturbs_black_pixels_less() {
        let mut image = create_uniform_luma_image(64, 64, 0);
        for y in 0..64 {
            for x in 32..64 {
                image.put_pixel(x, y, Luma([200]));
            }
        }
        let spec = NoiseSpec::BrightnessDependent {
            base_variance: 0.0,
            gain: 1.0,
        };
        let noisy = image.add_noise_seeded(&spec, 21).unwrap();
        // Zero brightness with zero base variance has zero noise
        for y in 0..64 {
            for x in 0..32 {
                assert_eq!(noisy.get_pixel(x, y), &Luma([0]));
            }
        }
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let image = create_uniform_luma_image(4, 4, 10);
        for spec in [
            NoiseSpec::additive(-1.0),
            NoiseSpec::impulse(1.5),
            NoiseSpec::impulse(-0.1),
            NoiseSpec::brightness_dependent(f64::NAN),
            NoiseSpec::coordinate_dependent(-5.0),
        ] {
            assert!(matches!(
                image.add_noise_seeded(&spec, 0),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn empty_image_is_rejected() {
        let image: Image<Luma<u8>> = ImageBuffer::new(3, 0);
        assert!(matches!(
            image.add_noise_seeded(&NoiseSpec::additive(100.0), 0),
            Err(Error::InvalidInput(_))
        ));
    }
}
