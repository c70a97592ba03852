use crate::pixels::{PixelType, RgbColor};

/// Read-only access to decoded image data.
///
/// Filters consume any type implementing this trait, so it may be implemented
/// for buffers of foreign crates. A filter calls each method once per call
/// and validates the returned values before the first pixel is read.
pub trait ImageView {
    fn pixel_type(&self) -> PixelType;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Count of bytes between the starts of two consecutive rows.
    fn stride(&self) -> usize;

    /// Buffer with image pixels data.
    fn buffer(&self) -> &[u8];
}

/// Reading of pixels one at a time, without knowledge about
/// a layout of the buffer.
pub trait PixelAccessor {
    /// Returns color of the pixel.
    ///
    /// # Panics
    ///
    /// If `x` or `y` is outside of the image.
    fn get_pixel(&self, x: u32, y: u32) -> RgbColor;
}

/// Writing of pixels one at a time, without knowledge about
/// a layout of the buffer.
pub trait PixelAccessorMut: PixelAccessor {
    /// Changes color channels of the pixel. Other channels (alpha) stay untouched.
    ///
    /// # Panics
    ///
    /// If `x` or `y` is outside of the image.
    fn set_pixel(&mut self, x: u32, y: u32, color: RgbColor);
}

impl<V: ImageView + ?Sized> PixelAccessor for V {
    fn get_pixel(&self, x: u32, y: u32) -> RgbColor {
        let pixel_type = self.pixel_type();
        let range = pixel_range(x, y, self.width(), self.height(), self.stride(), pixel_type);
        let pixel = &self.buffer()[range];
        let [r, g, b] = pixel_type.rgb_offsets();
        RgbColor::new(pixel[r], pixel[g], pixel[b])
    }
}

pub(crate) fn pixel_range(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    stride: usize,
    pixel_type: PixelType,
) -> std::ops::Range<usize> {
    assert!(
        x < width && y < height,
        "Pixel ({x}, {y}) is out of the image with size {width}x{height}"
    );
    let start = y as usize * stride + x as usize * pixel_type.size();
    start..start + pixel_type.size()
}
