use crate::imageops_lab::box_filter::BoxFilter;
use crate::imageops_lab::mode_filter::ModeFilter;
use crate::Image;
use image::Luma;
use imageproc::filter::{gaussian_blur_f32, median_filter};
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};
use serde::Serialize;
use std::fmt;

/// A smoothing or morphological operator used by the filter benchmark
///
/// Kernels are opaque `image -> image` functions: they always return an
/// image with the dimensions of the input.
pub trait FilterKernel: Send + Sync {
    fn apply(&self, image: &Image<Luma<u8>>) -> Image<Luma<u8>>;
}

impl<F> FilterKernel for F
where
    F: Fn(&Image<Luma<u8>>) -> Image<Luma<u8>> + Send + Sync,
{
    fn apply(&self, image: &Image<Luma<u8>>) -> Image<Luma<u8>> {
        self(image)
    }
}

/// Whether a filter is a linear convolution or a non-linear operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FilterCategory {
    Linear,
    #[serde(rename = "Non-Linear")]
    NonLinear,
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::NonLinear => f.write_str("Non-Linear"),
        }
    }
}

/// A named catalog entry
pub struct FilterSpec {
    pub name: String,
    pub category: FilterCategory,
    pub kernel: Box<dyn FilterKernel>,
}

impl FilterSpec {
    pub fn new(
        name: impl Into<String>,
        category: FilterCategory,
        kernel: impl FilterKernel + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            kernel: Box::new(kernel),
        }
    }

    #[must_use]
    pub fn apply(&self, image: &Image<Luma<u8>>) -> Image<Luma<u8>> {
        self.kernel.apply(image)
    }
}

impl fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSpec")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Mean over a `(2r+1)²` window with replicated edges, computed from a summed-area table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxBlur {
    pub radius: u32,
}

impl FilterKernel for BoxBlur {
    fn apply(&self, image: &Image<Luma<u8>>) -> Image<Luma<u8>> {
        // Only an empty image can fail, and it has nothing to blur.
        image
            .box_filter_square(self.radius)
            .unwrap_or_else(|_| image.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBlur {
    pub sigma: f32,
}

impl FilterKernel for GaussianBlur {
    fn apply(&self, image: &Image<Luma<u8>>) -> Image<Luma<u8>> {
        gaussian_blur_f32(image, self.sigma)
    }
}

/// Unsharp masking
///
/// `out = in + (in - blur(in)) * percent / 100` wherever
/// `|in - blur(in)| >= threshold`; other pixels are passed through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnsharpMask {
    pub sigma: f32,
    pub percent: u32,
    pub threshold: u8,
}

impl FilterKernel for UnsharpMask {
    fn apply(&self, image: &Image<Luma<u8>>) -> Image<Luma<u8>> {
        let blurred = gaussian_blur_f32(image, self.sigma);
        let amount = self.percent as f32 / 100.0;
        let mut output = image.clone();

        for (out, blur) in output.pixels_mut().zip(blurred.pixels()) {
            let original = out[0];
            let diff = i16::from(original) - i16::from(blur[0]);
            if diff.unsigned_abs() >= u16::from(self.threshold) {
                let sharpened = f32::from(original) + f32::from(diff) * amount;
                out[0] = sharpened.round().clamp(0.0, 255.0) as u8;
            }
        }

        output
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedianFilter {
    pub radius: u32,
}

impl FilterKernel for MedianFilter {
    fn apply(&self, image: &Image<Luma<u8>>) -> Image<Luma<u8>> {
        median_filter(image, self.radius, self.radius)
    }
}

/// Grayscale erosion over a square window (the "min" filter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinFilter {
    pub radius: u8,
}

impl FilterKernel for MinFilter {
    fn apply(&self, image: &Image<Luma<u8>>) -> Image<Luma<u8>> {
        grayscale_erode(image, &Mask::square(self.radius))
    }
}

/// Grayscale dilation over a square window (the "max" filter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxFilter {
    pub radius: u8,
}

impl FilterKernel for MaxFilter {
    fn apply(&self, image: &Image<Luma<u8>>) -> Image<Luma<u8>> {
        grayscale_dilate(image, &Mask::square(self.radius))
    }
}

/// The ten benchmark filters: three linear, seven non-linear
///
/// The order is fixed and defines the filter-minor order of every report.
#[must_use]
pub fn standard_catalog() -> Vec<FilterSpec> {
    use FilterCategory::{Linear, NonLinear};

    vec![
        FilterSpec::new("Box Blur (3x3)", Linear, BoxBlur { radius: 1 }),
        FilterSpec::new("Gaussian Blur (R=2)", Linear, GaussianBlur { sigma: 2.0 }),
        FilterSpec::new(
            "Unsharp Mask",
            Linear,
            UnsharpMask {
                sigma: 2.0,
                percent: 150,
                threshold: 3,
            },
        ),
        FilterSpec::new("Median (3x3)", NonLinear, MedianFilter { radius: 1 }),
        FilterSpec::new("Median (5x5)", NonLinear, MedianFilter { radius: 2 }),
        FilterSpec::new("Min Filter (3x3)", NonLinear, MinFilter { radius: 1 }),
        FilterSpec::new("Max Filter (3x3)", NonLinear, MaxFilter { radius: 1 }),
        FilterSpec::new("Min Filter (5x5)", NonLinear, MinFilter { radius: 2 }),
        FilterSpec::new("Max Filter (5x5)", NonLinear, MaxFilter { radius: 2 }),
        FilterSpec::new("Mode Filter (3x3)", NonLinear, ModeFilter::new(1)),
    ]
}
