use crate::error::Error;
use crate::imageops_lab::noise::{AddNoise, NoiseSpec};
use crate::utils::validate_non_empty_image;
use crate::Image;
use image::Luma;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Side length the standard batch expects for its reference image.
pub const REFERENCE_SIZE: u32 = 128;

/// Label of the unmodified reference inside a batch.
pub const REFERENCE_LABEL: &str = "0";

/// One configured degradation in a batch
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseBatchEntry {
    pub label: String,
    pub spec: NoiseSpec,
}

impl NoiseBatchEntry {
    #[must_use]
    pub fn new(label: impl Into<String>, spec: NoiseSpec) -> Self {
        Self {
            label: label.into(),
            spec,
        }
    }

    /// Human readable summary, e.g. "Additive noise, variance 100"
    #[must_use]
    pub fn describe(&self) -> String {
        match self.spec {
            NoiseSpec::Additive { variance, .. } => {
                format!("Additive noise, variance {}", variance)
            }
            NoiseSpec::Impulse { density } => {
                format!("Impulse noise, {}% density", density * 100.0)
            }
            NoiseSpec::BrightnessDependent { gain, .. } => {
                format!("Brightness-dependent noise, gain {}", gain)
            }
            NoiseSpec::CoordinateDependent { max_variance } => {
                format!("Coordinate-dependent noise, max variance {}", max_variance)
            }
        }
    }
}

/// A generated grayscale image with its batch label
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    pub label: String,
    pub image: Image<Luma<u8>>,
}

/// Ordered set of degradations generated from one reference image
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseBatch {
    entries: Vec<NoiseBatchEntry>,
}

impl NoiseBatch {
    #[must_use]
    pub fn new(entries: Vec<NoiseBatchEntry>) -> Self {
        Self { entries }
    }

    /// The eight degradations labeled "1" to "8"
    ///
    /// | label | noise |
    /// |-------|-------|
    /// | 1, 2  | additive, variance 100 / 400 |
    /// | 3, 4  | impulse, density 2 % / 10 % |
    /// | 5, 6  | brightness-dependent, gain 0.1 / 0.3 |
    /// | 7, 8  | coordinate-dependent, max variance 100 / 300 |
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            NoiseBatchEntry::new("1", NoiseSpec::additive(100.0)),
            NoiseBatchEntry::new("2", NoiseSpec::additive(400.0)),
            NoiseBatchEntry::new("3", NoiseSpec::impulse(0.02)),
            NoiseBatchEntry::new("4", NoiseSpec::impulse(0.10)),
            NoiseBatchEntry::new("5", NoiseSpec::brightness_dependent(0.1)),
            NoiseBatchEntry::new("6", NoiseSpec::brightness_dependent(0.3)),
            NoiseBatchEntry::new("7", NoiseSpec::coordinate_dependent(100.0)),
            NoiseBatchEntry::new("8", NoiseSpec::coordinate_dependent(300.0)),
        ])
    }

    #[must_use]
    pub fn entries(&self) -> &[NoiseBatchEntry] {
        &self.entries
    }

    /// Generates the reference (label "0") followed by every entry in order
    ///
    /// A single generator seeded with `seed` drives all entries, so the
    /// whole batch is reproducible from one seed.
    ///
    /// # Errors
    ///
    /// * `Error::SizeMismatch` - the reference is not
    ///   `REFERENCE_SIZE x REFERENCE_SIZE`
    /// * any error of [`AddNoise::add_noise`]
    pub fn generate(
        &self,
        reference: &Image<Luma<u8>>,
        seed: u64,
    ) -> Result<Vec<LabeledSample>, Error> {
        let (width, height) = reference.dimensions();
        if width != REFERENCE_SIZE || height != REFERENCE_SIZE {
            return Err(Error::SizeMismatch {
                required: REFERENCE_SIZE,
                width,
                height,
            });
        }
        self.generate_unchecked(reference, seed)
    }

    /// Same as [`NoiseBatch::generate`] without the reference size check
    ///
    /// # Errors
    ///
    /// * `Error::InvalidInput` - the reference is empty
    /// * any error of [`AddNoise::add_noise`]
    pub fn generate_unchecked(
        &self,
        reference: &Image<Luma<u8>>,
        seed: u64,
    ) -> Result<Vec<LabeledSample>, Error> {
        let (width, height) = reference.dimensions();
        validate_non_empty_image(width, height, "Noise batch")?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut samples = Vec::with_capacity(self.entries.len() + 1);
        samples.push(LabeledSample {
            label: REFERENCE_LABEL.to_string(),
            image: reference.clone(),
        });

        for entry in &self.entries {
            let image = reference.add_noise(&entry.spec, &mut rng)?;
            tracing::debug!(label = %entry.label, description = %entry.describe(), "sample generated");
            samples.push(LabeledSample {
                label: entry.label.clone(),
                image,
            });
        }

        tracing::info!(count = samples.len(), seed, "noise batch generated");
        Ok(samples)
    }
}

impl Default for NoiseBatch {
    fn default() -> Self {
        Self::standard()
    }
}
