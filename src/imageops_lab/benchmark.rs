use crate::error::Error;
use crate::imageops_lab::filters::{FilterCategory, FilterSpec};
use crate::imageops_lab::metrics::mean_squared_error;
use crate::imageops_lab::noise_batch::LabeledSample;
use crate::utils::{validate_matching_dimensions, validate_non_empty_image};
use crate::Image;
use image::Luma;
use itertools::Itertools;
use serde::Serialize;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// A labeled input to the benchmark whose image may have failed to load
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSource {
    pub label: String,
    pub image: Result<Image<Luma<u8>>, Error>,
}

impl SampleSource {
    #[must_use]
    pub fn loaded(label: impl Into<String>, image: Image<Luma<u8>>) -> Self {
        Self {
            label: label.into(),
            image: Ok(image),
        }
    }

    /// A sample that could not be obtained; it is skipped by the benchmark.
    #[must_use]
    pub fn missing(label: impl Into<String>, reason: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            image: Err(Error::MissingSample {
                label: label.clone(),
                reason: reason.into(),
            }),
            label,
        }
    }
}

impl From<LabeledSample> for SampleSource {
    fn from(sample: LabeledSample) -> Self {
        Self::loaded(sample.label, sample.image)
    }
}

/// One (image, filter) measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRow {
    #[serde(rename = "image")]
    pub source_label: String,
    pub filter_name: String,
    pub category: FilterCategory,
    pub mse: f64,
}

/// A sample or single comparison that produced no row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSample {
    pub label: String,
    /// Set when only one filter's comparison failed
    pub filter_name: Option<String>,
    pub reason: String,
    #[serde(skip)]
    pub error: Error,
}

impl SkippedSample {
    fn new(label: &str, filter_name: Option<&str>, error: Error) -> Self {
        Self {
            label: label.to_string(),
            filter_name: filter_name.map(str::to_string),
            reason: error.to_string(),
            error,
        }
    }
}

/// Result of a benchmark run
///
/// `rows` are ordered image-major, filter-minor: all filters for the first
/// sample in catalog order, then all filters for the second sample, and so on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub rows: Vec<BenchmarkRow>,
    pub skipped: Vec<SkippedSample>,
}

impl BenchmarkReport {
    /// The lowest-MSE row of each image, in image order
    #[must_use]
    pub fn best_per_image(&self) -> Vec<&BenchmarkRow> {
        self.rows
            .iter()
            .chunk_by(|row| row.source_label.as_str())
            .into_iter()
            .filter_map(|(_, group)| group.min_by(|a, b| a.mse.total_cmp(&b.mse)))
            .collect()
    }

    /// Rows measured for one image label, in catalog order
    pub fn rows_for<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a BenchmarkRow> + 'a {
        self.rows.iter().filter(move |row| row.source_label == label)
    }
}

/// Applies every catalog filter to every sample and scores it against `reference`
///
/// Samples that failed to load or whose shape differs from the reference
/// are recorded in [`BenchmarkReport::skipped`] and the run continues.
/// With the `rayon` feature samples are processed in parallel; the row
/// order is the same either way.
///
/// # Errors
///
/// * `Error::InvalidInput` - the reference image is empty
pub fn run_benchmark(
    reference: &Image<Luma<u8>>,
    degraded: &[SampleSource],
    catalog: &[FilterSpec],
) -> Result<BenchmarkReport, Error> {
    let (width, height) = reference.dimensions();
    validate_non_empty_image(width, height, "Benchmark reference")?;

    #[cfg(feature = "rayon")]
    let outcomes: Vec<BenchmarkReport> = degraded
        .par_iter()
        .map(|sample| evaluate_sample(reference, sample, catalog))
        .collect();

    #[cfg(not(feature = "rayon"))]
    let outcomes: Vec<BenchmarkReport> = degraded
        .iter()
        .map(|sample| evaluate_sample(reference, sample, catalog))
        .collect();

    let mut report = BenchmarkReport::default();
    for outcome in outcomes {
        report.rows.extend(outcome.rows);
        report.skipped.extend(outcome.skipped);
    }

    tracing::info!(
        rows = report.rows.len(),
        skipped = report.skipped.len(),
        filters = catalog.len(),
        "benchmark finished"
    );
    Ok(report)
}

fn evaluate_sample(
    reference: &Image<Luma<u8>>,
    sample: &SampleSource,
    catalog: &[FilterSpec],
) -> BenchmarkReport {
    let mut outcome = BenchmarkReport::default();

    let image = match &sample.image {
        Ok(image) => image,
        Err(err) => {
            tracing::warn!(label = %sample.label, error = %err, "skipping sample");
            let error = match err {
                Error::MissingSample { .. } => err.clone(),
                other => Error::MissingSample {
                    label: sample.label.clone(),
                    reason: other.to_string(),
                },
            };
            outcome
                .skipped
                .push(SkippedSample::new(&sample.label, None, error));
            return outcome;
        }
    };

    if let Err(err) = validate_matching_dimensions(reference.dimensions(), image.dimensions()) {
        tracing::warn!(label = %sample.label, error = %err, "skipping sample");
        outcome
            .skipped
            .push(SkippedSample::new(&sample.label, None, err));
        return outcome;
    }

    for filter in catalog {
        let filtered = filter.apply(image);
        match mean_squared_error(reference, &filtered) {
            Ok(mse) => {
                tracing::debug!(label = %sample.label, filter = %filter.name, mse, "scored");
                outcome.rows.push(BenchmarkRow {
                    source_label: sample.label.clone(),
                    filter_name: filter.name.clone(),
                    category: filter.category,
                    mse,
                });
            }
            Err(err) => {
                tracing::warn!(label = %sample.label, filter = %filter.name, error = %err, "comparison failed");
                outcome.skipped.push(SkippedSample::new(
                    &sample.label,
                    Some(filter.name.as_str()),
                    err,
                ));
            }
        }
    }

    outcome
}
