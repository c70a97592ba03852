use std::fmt;
use std::time::{Duration, Instant};

use crate::convolution::{Convolver, Kernel, ReadRgb, WriteRgb};
use crate::image_view::{PixelAccessor, PixelAccessorMut};
use crate::images::{Image, ImageRef};
use crate::locked_buffer::{LockedDst, LockedSrc};
use crate::{DimensionMismatchError, FilterError, ImageView, UnsupportedPixelFormatError};

/// The way the filter reads pixels of the source image
/// and writes pixels of the destination image.
///
/// All strategies produce byte-identical images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterStrategy {
    /// Every pixel is read and written through [PixelAccessor] and [PixelAccessorMut].
    AccessorBased,
    /// Pixels are addressed directly in locked buffers of the images.
    DirectBuffer,
    /// Same as `DirectBuffer`, but bands of rows are processed in parallel.
    DirectBufferParallel,
}

impl FilterStrategy {
    pub const ALL: [FilterStrategy; 3] = [
        Self::AccessorBased,
        Self::DirectBuffer,
        Self::DirectBufferParallel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AccessorBased => "Get/SetPixel",
            Self::DirectBuffer => "Direct buffer",
            Self::DirectBufferParallel => "Parallel direct buffer",
        }
    }
}

impl fmt::Display for FilterStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Applies a convolution kernel to RGB images.
///
/// Samples outside of the image are replaced by the nearest edge pixel.
/// Only red, green and blue channels are computed, other bytes
/// of the destination pixels (alpha) are zero.
#[derive(Debug, Clone)]
pub struct MatrixFilter {
    kernel: Kernel,
}

impl MatrixFilter {
    pub fn new(kernel: Kernel) -> Self {
        Self { kernel }
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Filters the source image into a new image with the same
    /// dimensions and pixel type.
    ///
    /// The kernel, the pixel type and dimensions of the source image are
    /// checked before the destination image is allocated, so every strategy
    /// returns the same error for the same invalid input.
    pub fn apply(
        &self,
        src_image: &impl ImageView,
        strategy: FilterStrategy,
    ) -> Result<Image<'static>, FilterError> {
        match strategy {
            FilterStrategy::AccessorBased => self.apply_accessor(src_image),
            FilterStrategy::DirectBuffer => self.apply_direct(src_image),
            FilterStrategy::DirectBufferParallel => self.apply_direct_parallel(src_image),
        }
    }

    /// Same as [MatrixFilter::apply], but also returns wall-clock time
    /// spent on filtering.
    pub fn apply_timed(
        &self,
        src_image: &impl ImageView,
        strategy: FilterStrategy,
    ) -> Result<(Image<'static>, Duration), FilterError> {
        let start = Instant::now();
        let dst_image = self.apply(src_image, strategy)?;
        Ok((dst_image, start.elapsed()))
    }

    pub fn apply_accessor(
        &self,
        src_image: &impl ImageView,
    ) -> Result<Image<'static>, FilterError> {
        let (convolver, src_image) = self.prepare(src_image)?;
        let mut dst_image = allocate_destination(&src_image)?;
        convolver.convolve_rows(
            &AccessorSrc(&src_image),
            &mut AccessorDst(&mut dst_image),
            0..convolver.height(),
        );
        Ok(dst_image)
    }

    pub fn apply_direct(
        &self,
        src_image: &impl ImageView,
    ) -> Result<Image<'static>, FilterError> {
        self.apply_locked(src_image, |convolver, src, dst| {
            convolver.convolve_rows(src, dst.rows(), 0..convolver.height());
        })
    }

    pub fn apply_direct_parallel(
        &self,
        src_image: &impl ImageView,
    ) -> Result<Image<'static>, FilterError> {
        self.apply_locked(src_image, convolve_parallel)
    }

    fn apply_locked(
        &self,
        src_image: &impl ImageView,
        convolve: impl FnOnce(&Convolver, &LockedSrc, &mut LockedDst),
    ) -> Result<Image<'static>, FilterError> {
        let (convolver, src_image) = self.prepare(src_image)?;
        let src = LockedSrc::acquire(&src_image)?;
        let mut dst_image = allocate_destination(&src_image)?;
        let mut dst = LockedDst::acquire(&mut dst_image)?;
        convolve(&convolver, &src, &mut dst);
        drop(dst);
        drop(src);
        Ok(dst_image)
    }

    /// Checks the kernel and takes a snapshot of the source geometry.
    ///
    /// Methods of the source view are called once, everything after this
    /// uses only the returned snapshot.
    fn prepare<'b>(
        &self,
        src_image: &'b impl ImageView,
    ) -> Result<(Convolver<'_>, ImageRef<'b>), FilterError> {
        let radius = self.kernel.radius()?;
        let src_image = snapshot(src_image)?;
        let convolver =
            Convolver::new(&self.kernel, radius, src_image.width(), src_image.height());
        Ok((convolver, src_image))
    }
}

fn snapshot(src_image: &impl ImageView) -> Result<ImageRef<'_>, FilterError> {
    let pixel_type = src_image.pixel_type();
    if !pixel_type.has_rgb() {
        return Err(UnsupportedPixelFormatError::NotEnoughColorChannels(pixel_type).into());
    }
    let (width, height) = (src_image.width(), src_image.height());
    if width == 0 || height == 0 {
        return Err(DimensionMismatchError::ZeroDimensions.into());
    }
    let image_ref = ImageRef::with_stride(
        width,
        height,
        src_image.stride(),
        src_image.buffer(),
        pixel_type,
    )?;
    Ok(image_ref)
}

fn allocate_destination(src_image: &ImageRef) -> Result<Image<'static>, FilterError> {
    test_log!("allocate destination image");
    let dst_image = Image::try_new(
        src_image.width(),
        src_image.height(),
        src_image.pixel_type(),
    )?;
    Ok(dst_image)
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        fn convolve_parallel(convolver: &Convolver, src: &LockedSrc, dst: &mut LockedDst) {
            crate::threading::convolve_by_bands(convolver, src, dst);
        }
    } else {
        fn convolve_parallel(convolver: &Convolver, src: &LockedSrc, dst: &mut LockedDst) {
            test_log!("convolve rows on the current thread");
            for mut band in dst.split_by_height(convolver.height()) {
                let rows = band.rows_range();
                convolver.convolve_rows(src, &mut band, rows);
            }
        }
    }
}

struct AccessorSrc<'a, 'b>(&'a ImageRef<'b>);

impl ReadRgb for AccessorSrc<'_, '_> {
    #[inline]
    fn read_rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.0.get_pixel(x, y).into()
    }
}

struct AccessorDst<'a, 'b>(&'a mut Image<'b>);

impl WriteRgb for AccessorDst<'_, '_> {
    #[inline]
    fn write_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self.0.set_pixel(x, y, rgb.into());
    }
}
