use std::ops::Range;

pub use kernels::*;

use border::clamp_to_edge;

mod border;
mod kernels;

/// Reading of color channels of the source image.
pub(crate) trait ReadRgb {
    /// `x` and `y` are always inside the image.
    fn read_rgb(&self, x: u32, y: u32) -> [u8; 3];
}

/// Writing of color channels of the destination image.
pub(crate) trait WriteRgb {
    fn write_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]);
}

/// Kernel prepared for convolution of an image with known size.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Convolver<'a> {
    weights: &'a [f64],
    side: usize,
    radius: i64,
    width: u32,
    height: u32,
}

impl<'a> Convolver<'a> {
    /// `radius` must be derived from the kernel and both
    /// dimensions of the image must be non-zero.
    pub fn new(kernel: &'a Kernel, radius: u32, width: u32, height: u32) -> Self {
        debug_assert_eq!(kernel.side(), radius * 2 + 1);
        debug_assert!(width > 0 && height > 0);
        Self {
            weights: kernel.weights(),
            side: kernel.side() as usize,
            radius: radius as i64,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn kernel_side(&self) -> u32 {
        self.side as u32
    }

    pub fn convolve_rows(&self, src: &impl ReadRgb, dst: &mut impl WriteRgb, rows: Range<u32>) {
        for y in rows {
            for x in 0..self.width {
                let rgb = self.convolve_pixel(src, x, y);
                dst.write_rgb(x, y, rgb);
            }
        }
    }

    #[inline(always)]
    fn convolve_pixel(&self, src: &impl ReadRgb, x: u32, y: u32) -> [u8; 3] {
        let r = self.radius;
        let (x, y) = (x as i64, y as i64);
        let mut sum = [0f64; 3];
        for n in x - r..=x + r {
            let i = clamp_to_edge(n, self.width);
            // Weights of the matrix row [n - x + r, ..]
            let row_start = (n - x + r) as usize * self.side;
            let ks = &self.weights[row_start..row_start + self.side];
            for (m, &k) in (y - r..=y + r).zip(ks) {
                let j = clamp_to_edge(m, self.height);
                let [red, green, blue] = src.read_rgb(i, j);
                sum[0] += red as f64 * k;
                sum[1] += green as f64 * k;
                sum[2] += blue as f64 * k;
            }
        }
        sum.map(narrow_to_u8)
    }
}

/// Converts accumulated value into a channel byte: the fractional part
/// is dropped and only the low 8 bits of the integer part are kept.
/// Values outside `[0, 255]` wrap around instead of being clamped.
#[inline(always)]
fn narrow_to_u8(value: f64) -> u8 {
    value as i64 as u8
}
