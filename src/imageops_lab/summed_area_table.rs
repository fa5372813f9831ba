use crate::error::Error;
use crate::utils::validate_non_empty_image;
use crate::Image;
use image::{Luma, Primitive};

/// 積分画像（Summed-Area Table）の構造体
///
/// 積分画像は、原点(0,0)から指定座標(x,y)までの矩形領域内の
/// 全ピクセル値の累積和を効率的に計算するためのデータ構造です。
pub struct SummedAreaTable<T> {
    /// 積分画像のデータ
    data: Vec<T>,
    /// 画像の幅
    width: u32,
    /// 画像の高さ
    height: u32,
}

/// 画像から積分画像を作成する機能を提供するトレイト
pub trait CreateSummedAreaTable<T>
where
    T: Primitive + 'static,
{
    /// 画像から積分画像を作成します
    ///
    /// # Errors
    ///
    /// * `Error::InvalidInput` - 空の画像が渡された場合
    ///
    /// # Examples
    ///
    /// ```
    /// use imageops_lab::{CreateSummedAreaTable, Image, SummedAreaTable};
    /// use image::{ImageBuffer, Luma};
    ///
    /// let image: Image<Luma<u8>> = ImageBuffer::from_pixel(4, 4, Luma([1]));
    /// let sat: SummedAreaTable<u64> = image.create_summed_area_table().unwrap();
    /// assert_eq!(sat.rectangle_sum(0, 0, 3, 3), 16);
    /// ```
    fn create_summed_area_table(&self) -> Result<SummedAreaTable<T>, Error>;
}

/// u8画像用の実装：大きな画像でもオーバーフローしないようu64を使用
impl CreateSummedAreaTable<u64> for Image<Luma<u8>> {
    fn create_summed_area_table(&self) -> Result<SummedAreaTable<u64>, Error> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height, "Summed-area table")?;

        let data: Vec<u64> = self.as_raw().iter().map(|&v| u64::from(v)).collect();
        Ok(SummedAreaTable::from_data(&data, width, height))
    }
}

impl<T> SummedAreaTable<T>
where
    T: Primitive,
{
    /// 単一チャンネルのデータから積分画像を作成します
    ///
    /// # 引数
    /// * `data` - 元となる画像データ（行優先順序）
    /// * `width` - 画像の幅
    /// * `height` - 画像の高さ
    ///
    /// # Panics
    /// `data` の長さが `width * height` と一致しない場合
    #[must_use]
    pub fn from_data(data: &[T], width: u32, height: u32) -> Self {
        let w = width as usize;
        let h = height as usize;
        assert_eq!(data.len(), w * h);

        let mut sat_data = vec![T::zero(); data.len()];

        for y in 0..h {
            for x in 0..w {
                let current_index = y * w + x;

                // sat(x, y) = src(x, y) + sat(x-1, y) + sat(x, y-1) - sat(x-1, y-1)
                let mut sum = data[current_index];

                // 左のピクセルの値を加算
                if x > 0 {
                    sum = sum + sat_data[current_index - 1];
                }

                // 上のピクセルの値を加算
                if y > 0 {
                    sum = sum + sat_data[current_index - w];
                }

                // 左上のピクセルの値を減算（重複分を除去）
                if x > 0 && y > 0 {
                    sum = sum - sat_data[current_index - w - 1];
                }

                sat_data[current_index] = sum;
            }
        }

        Self {
            data: sat_data,
            width,
            height,
        }
    }

    /// 指定された座標での積分画像の値を取得します
    ///
    /// 座標が範囲外の場合は0
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> T {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            T::zero()
        } else {
            self.data[y as usize * self.width as usize + x as usize]
        }
    }

    /// 指定された矩形領域内のピクセル値の合計を計算します
    ///
    /// 座標はすべて含む（inclusive）。画像外の部分は切り詰められます。
    ///
    /// # 計算式
    /// Sum = sat(x2, y2) - sat(x1-1, y2) - sat(x2, y1-1) + sat(x1-1, y1-1)
    #[must_use]
    pub fn rectangle_sum(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> T {
        let x1 = x1.max(0);
        let y1 = y1.max(0);
        let x2 = x2.min(self.width as i32 - 1);
        let y2 = y2.min(self.height as i32 - 1);

        if x1 > x2 || y1 > y2 {
            return T::zero();
        }

        let bottom_right = self.get(x2, y2);
        let top_right = self.get(x2, y1 - 1);
        let bottom_left = self.get(x1 - 1, y2);
        let top_left = self.get(x1 - 1, y1 - 1);

        // 符号なし型でのアンダーフローを避けるため加算を先に行う
        bottom_right + top_left - top_right - bottom_left
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}
