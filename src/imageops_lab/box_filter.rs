use crate::error::Error;
use crate::imageops_lab::summed_area_table::{CreateSummedAreaTable, SummedAreaTable};
use crate::utils::{round_f64_to_u8, validate_non_empty_image};
use crate::Image;
use image::{ImageBuffer, Luma};

/// 積分画像を使用したボックスフィルタ操作を提供するトレイト
///
/// 積分画像（Summed-Area Table）を使用するため、カーネルサイズに
/// 関係なく一定時間で各ピクセルの平均値を計算できます。
/// 画像の境界では端のピクセルを複製し、常に `(2r+1)²` 個で平均します。
pub trait BoxFilter {
    /// 指定した半径でボックスフィルタを適用する
    ///
    /// # 引数
    ///
    /// * `x_radius` - X方向の半径（ピクセル単位）
    /// * `y_radius` - Y方向の半径（ピクセル単位）
    ///
    /// # エラー
    ///
    /// * `Error::InvalidInput` - 空の画像に対して処理を実行した場合
    fn box_filter(&self, x_radius: u32, y_radius: u32) -> Result<Image<Luma<u8>>, Error>;

    /// 正方形のカーネルでボックスフィルタを適用する
    fn box_filter_square(&self, radius: u32) -> Result<Image<Luma<u8>>, Error> {
        self.box_filter(radius, radius)
    }
}

impl BoxFilter for Image<Luma<u8>> {
    fn box_filter(&self, x_radius: u32, y_radius: u32) -> Result<Image<Luma<u8>>, Error> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height, "Box filter")?;

        let padded = replicate_border(self, x_radius, y_radius);
        let sat: SummedAreaTable<u64> = padded.create_summed_area_table()?;
        Ok(apply_sat_box_filter(&sat, width, height, x_radius, y_radius))
    }
}

/// 端のピクセルを複製して各辺を半径分だけ拡張する
fn replicate_border(image: &Image<Luma<u8>>, x_radius: u32, y_radius: u32) -> Image<Luma<u8>> {
    let (width, height) = image.dimensions();
    let padded_width = width + 2 * x_radius;
    let padded_height = height + 2 * y_radius;

    ImageBuffer::from_fn(padded_width, padded_height, |x, y| {
        let src_x = x.saturating_sub(x_radius).min(width - 1);
        let src_y = y.saturating_sub(y_radius).min(height - 1);
        *image.get_pixel(src_x, src_y)
    })
}

/// 拡張済み画像の積分画像から、元サイズのLuma<u8>画像を作る内部実装
fn apply_sat_box_filter(
    sat: &SummedAreaTable<u64>,
    width: u32,
    height: u32,
    x_radius: u32,
    y_radius: u32,
) -> Image<Luma<u8>> {
    let area = f64::from(2 * x_radius + 1) * f64::from(2 * y_radius + 1);
    let mut output = ImageBuffer::new(width, height);

    for y in 0..height {
        for x in 0..width {
            // 拡張画像では (x, y) が窓の左上になる
            let x1 = x as i32;
            let y1 = y as i32;
            let x2 = (x + 2 * x_radius) as i32;
            let y2 = (y + 2 * y_radius) as i32;

            let sum = sat.rectangle_sum(x1, y1, x2, y2) as f64;
            output.put_pixel(x, y, Luma([round_f64_to_u8(sum / area)]));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_checkerboard_luma_image, create_uniform_luma_image};

    #[test]
    fn box_filter_with_uniform_image_is_identity() {
        let image = create_uniform_luma_image(5, 5, 90);
        let filtered = image.box_filter_square(1).unwrap();
        assert_eq!(filtered, image);
    }

    #[test]
    fn box_filter_averages_interior_window() {
        let data = vec![1u8, 2, 3, 4, 5, 6, 7, 8, 9];
        let image: Image<Luma<u8>> = ImageBuffer::from_raw(3, 3, data).unwrap();
        let filtered = image.box_filter_square(1).unwrap();

        // 中央: 45 / 9
        assert_eq!(filtered.get_pixel(1, 1), &Luma([5]));
        // 左上は端の複製で (1+1+2) * 2 + (4+4+5) = 21, 21 / 9 = 2.33
        assert_eq!(filtered.get_pixel(0, 0), &Luma([2]));
        // 右下は (5+6+6) + (8+9+9) * 2 = 69, 69 / 9 = 7.67
        assert_eq!(filtered.get_pixel(2, 2), &Luma([8]));
    }

    #[test]
    fn box_filter_smooths_checkerboard() {
        let image = create_checkerboard_luma_image(6, 6, 0, 90);
        let filtered = image.box_filter_square(1).unwrap();
        // 内部の3x3ウィンドウは4個または5個の明るいピクセルを含む
        let center = filtered.get_pixel(2, 2)[0];
        assert!(center == 40 || center == 50, "center = {center}");
    }

    #[test]
    fn box_filter_with_radius_larger_than_image_weights_replicated_edges() {
        let data = vec![0u8, 100, 200, 100];
        let image: Image<Luma<u8>> = ImageBuffer::from_raw(2, 2, data).unwrap();
        let filtered = image.box_filter_square(10).unwrap();
        // 21x21の窓: 近い側の列と行が11回、遠い側が10回数えられる
        // (0, 0): (10*11*100 + 11*10*200 + 10*10*100) / 441 = 97.5
        assert_eq!(filtered.get_pixel(0, 0), &Luma([98]));
        // (1, 1): (11*10*100 + 10*11*200 + 11*11*100) / 441 = 102.3
        assert_eq!(filtered.get_pixel(1, 1), &Luma([102]));
    }

    #[test]
    fn box_filter_replicates_border_of_single_row() {
        let data = vec![0u8, 90, 180];
        let image: Image<Luma<u8>> = ImageBuffer::from_raw(3, 1, data).unwrap();
        let filtered = image.box_filter(1, 0).unwrap();
        // 左端: (0 + 0 + 90) / 3, 右端: (90 + 180 + 180) / 3
        assert_eq!(filtered.into_raw(), vec![30, 90, 150]);
    }

    #[test]
    fn box_filter_with_empty_image_returns_error() {
        let image: Image<Luma<u8>> = ImageBuffer::new(0, 3);
        assert!(matches!(
            image.box_filter_square(1),
            Err(Error::InvalidInput(_))
        ));
    }
}
