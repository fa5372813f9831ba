mod error;
mod imageops_lab;
mod utils;

#[cfg(test)]
mod test_utils;

use image::{ImageBuffer, Luma, Pixel};

pub use error::Error;
pub use imageops_lab::benchmark::{
    run_benchmark, BenchmarkReport, BenchmarkRow, SampleSource, SkippedSample,
};
pub use imageops_lab::box_filter::BoxFilter;
pub use imageops_lab::codec::{load_batch, FsCodec, ImageCodec};
pub use imageops_lab::filters::{
    standard_catalog, BoxBlur, FilterCategory, FilterKernel, FilterSpec, GaussianBlur, MaxFilter,
    MedianFilter, MinFilter, UnsharpMask,
};
pub use imageops_lab::metrics::mean_squared_error;
pub use imageops_lab::mode_filter::ModeFilter;
pub use imageops_lab::noise::{AddNoise, NoiseSpec};
pub use imageops_lab::noise_batch::{
    LabeledSample, NoiseBatch, NoiseBatchEntry, REFERENCE_LABEL, REFERENCE_SIZE,
};
pub use imageops_lab::report::{render_table, to_json};
pub use imageops_lab::roberts::RobertsCross;
pub use imageops_lab::summed_area_table::{CreateSummedAreaTable, SummedAreaTable};

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;

/// 8-bit grayscale sample grid consumed and produced by every operation.
pub type SampleGrid = Image<Luma<u8>>;
