use crate::imageops_lab::filters::FilterKernel;
use crate::Image;
use image::{ImageBuffer, Luma};

/// Most-frequent-value filter for 8-bit grayscale images
///
/// Each output pixel is the value occurring most often in the
/// `(2r+1) x (2r+1)` window around it. Ties resolve to the darker value.
/// A value must occur more than `MIN_REPEATS` times to win; otherwise the
/// original pixel is kept, so isolated speckles survive only where the
/// neighbourhood has no dominant value. Windows are clipped at the border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeFilter {
    pub radius: u32,
}

impl ModeFilter {
    const MIN_REPEATS: u32 = 2;

    #[must_use]
    pub const fn new(radius: u32) -> Self {
        Self { radius }
    }
}

impl FilterKernel for ModeFilter {
    fn apply(&self, image: &Image<Luma<u8>>) -> Image<Luma<u8>> {
        let (width, height) = image.dimensions();
        let mut output = ImageBuffer::new(width, height);
        let mut histogram = [0u32; 256];

        for y in 0..height {
            let y1 = y.saturating_sub(self.radius);
            let y2 = y.saturating_add(self.radius).min(height - 1);
            for x in 0..width {
                let x1 = x.saturating_sub(self.radius);
                let x2 = x.saturating_add(self.radius).min(width - 1);

                histogram.fill(0);
                for wy in y1..=y2 {
                    for wx in x1..=x2 {
                        histogram[usize::from(image.get_pixel(wx, wy)[0])] += 1;
                    }
                }

                let (mode, count) = histogram
                    .iter()
                    .enumerate()
                    .fold((0usize, 0u32), |best, (value, &count)| {
                        if count > best.1 {
                            (value, count)
                        } else {
                            best
                        }
                    });

                let value = if count > Self::MIN_REPEATS {
                    mode as u8
                } else {
                    image.get_pixel(x, y)[0]
                };
                output.put_pixel(x, y, Luma([value]));
            }
        }

        output
    }
}
