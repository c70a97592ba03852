//! Layouts of pixels supported by images of the crate.

/// Layout of one pixel in a buffer: count of bytes and order of channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelType {
    /// One byte of luma.
    U8,
    /// Luma and alpha.
    U8x2,
    /// Red, green and blue bytes.
    U8x3,
    /// Blue, green and red bytes (24-bit GDI/BMP layout).
    U8x3Bgr,
    /// Red, green, blue and alpha bytes.
    U8x4,
    /// Blue, green, red and alpha bytes (32-bit GDI/BMP layout).
    U8x4Bgra,
}

impl PixelType {
    /// Size of one pixel in bytes.
    pub fn size(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U8x2 => 2,
            Self::U8x3 | Self::U8x3Bgr => 3,
            Self::U8x4 | Self::U8x4Bgra => 4,
        }
    }

    /// Returns `true` if pixel has separate red, green and blue channels.
    pub fn has_rgb(&self) -> bool {
        !matches!(self, Self::U8 | Self::U8x2)
    }

    /// Byte offsets of red, green and blue channels inside of pixel.
    ///
    /// All three offsets point to the luma byte for grayscale types.
    pub fn rgb_offsets(&self) -> [usize; 3] {
        match self {
            Self::U8 | Self::U8x2 => [0, 0, 0],
            Self::U8x3 | Self::U8x4 => [0, 1, 2],
            Self::U8x3Bgr | Self::U8x4Bgra => [2, 1, 0],
        }
    }
}

/// Color of pixel without alpha channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<RgbColor> for [u8; 3] {
    fn from(color: RgbColor) -> Self {
        [color.r, color.g, color.b]
    }
}
