use thiserror::Error;

/// Error type for the lab operations
///
/// Structural failures (a malformed grid handed to the edge detector or
/// the noise synthesizer) propagate to the caller. Per-sample failures
/// inside a benchmark run are recorded on the report instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The grid has no samples
    ///
    /// This error is returned when an operation receives an image
    /// with zero width or zero height.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An expected labeled sample could not be obtained
    ///
    /// Inside a benchmark run the sample is skipped and the run continues.
    #[error("Sample '{label}' is missing: {reason}")]
    MissingSample {
        /// Label of the sample ("0".."8" for the standard batch)
        label: String,
        /// Why the sample could not be obtained
        reason: String,
    },

    /// Reference and candidate grid shapes differ
    #[error("Image dimensions do not match: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height)
        expected: (u32, u32),
        /// Actual dimensions (width, height)
        actual: (u32, u32),
    },

    /// Reference image does not have the size a noise batch requires
    #[error("Reference image must be {required}x{required}, got {width}x{height}")]
    SizeMismatch {
        required: u32,
        width: u32,
        height: u32,
    },

    /// Invalid parameter provided to the operation
    ///
    /// This error is returned when a parameter value is invalid
    /// or outside the acceptable range for the operation.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Decoding or encoding through the image codec failed
    #[error("Codec error: {0}")]
    Codec(String),

    /// A report could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::Codec(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
