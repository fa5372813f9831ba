use crate::error::Error;
use crate::imageops_lab::benchmark::SampleSource;
use crate::Image;
use image::Luma;
use std::path::Path;

/// Decoding and encoding of 8-bit grayscale images
///
/// The core operations never touch the filesystem; everything that reads or
/// writes image files goes through this trait.
pub trait ImageCodec {
    /// Decodes any supported format and converts it to 8-bit luma.
    ///
    /// # Errors
    ///
    /// * `Error::Codec` - the file is missing or cannot be decoded
    fn load_gray(&self, path: &Path) -> Result<Image<Luma<u8>>, Error>;

    /// Encodes the image; the format follows the file extension.
    ///
    /// # Errors
    ///
    /// * `Error::Codec` - the image cannot be encoded or written
    fn save_gray(&self, image: &Image<Luma<u8>>, path: &Path) -> Result<(), Error>;
}

/// [`ImageCodec`] backed by the `image` crate and the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCodec;

impl ImageCodec for FsCodec {
    fn load_gray(&self, path: &Path) -> Result<Image<Luma<u8>>, Error> {
        let image = image::open(path)
            .map_err(|e| Error::Codec(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), width = image.width(), height = image.height(), "decoded");
        Ok(image.to_luma8())
    }

    fn save_gray(&self, image: &Image<Luma<u8>>, path: &Path) -> Result<(), Error> {
        image
            .save(path)
            .map_err(|e| Error::Codec(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "encoded");
        Ok(())
    }
}

/// Loads `<label>.bmp` for every label from `dir`
///
/// Files that are missing or unreadable become [`SampleSource::missing`]
/// entries so the benchmark can skip them.
pub fn load_batch<C, I, S>(codec: &C, dir: &Path, labels: I) -> Vec<SampleSource>
where
    C: ImageCodec + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|label| {
            let label = label.as_ref();
            let path = dir.join(format!("{}.bmp", label));
            match codec.load_gray(&path) {
                Ok(image) => SampleSource::loaded(label, image),
                Err(err) => {
                    tracing::warn!(label, error = %err, "sample not loaded");
                    SampleSource::missing(label, err.to_string())
                }
            }
        })
        .collect()
}
