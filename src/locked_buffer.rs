//! Scoped mappings of image buffers used by direct-buffer strategies.
//!
//! A lock checks once that the whole image lies inside the buffer, after
//! that pixels are addressed with plain stride/offset arithmetic.
//! Locks are released when the guards are dropped.
use crate::convolution::{ReadRgb, WriteRgb};
use crate::images::{required_buffer_size, Image, ImageRef};
use crate::{BufferAccessError, ImageView};

#[derive(Debug, Clone, Copy)]
struct Layout {
    stride: usize,
    pixel_size: usize,
    rgb_offsets: [usize; 3],
}

impl Layout {
    fn map(image: &impl ImageView, buffer_len: usize) -> Result<Self, BufferAccessError> {
        let pixel_type = image.pixel_type();
        let stride = image.stride();
        let required_size =
            required_buffer_size(image.width(), image.height(), stride, pixel_type)
                .ok_or(BufferAccessError::AddressOverflow)?;
        let row_size = image.width() as usize * pixel_type.size();
        if required_size > buffer_len || stride < row_size {
            return Err(BufferAccessError::OutOfBounds);
        }
        Ok(Self {
            stride,
            pixel_size: pixel_type.size(),
            rgb_offsets: pixel_type.rgb_offsets(),
        })
    }

    #[inline(always)]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride + x as usize * self.pixel_size
    }
}

/// Read-only mapping of the source image.
#[derive(Debug)]
pub(crate) struct LockedSrc<'a> {
    buffer: &'a [u8],
    layout: Layout,
    width: u32,
    height: u32,
}

impl<'a> LockedSrc<'a> {
    pub fn acquire(image: &ImageRef<'a>) -> Result<Self, BufferAccessError> {
        let buffer = image.buffer();
        let layout = Layout::map(image, buffer.len())?;
        test_log!("acquire source buffer lock");
        Ok(Self {
            buffer,
            layout,
            width: image.width(),
            height: image.height(),
        })
    }
}

impl Drop for LockedSrc<'_> {
    fn drop(&mut self) {
        test_log!("release source buffer lock");
    }
}

impl ReadRgb for LockedSrc<'_> {
    #[inline(always)]
    fn read_rgb(&self, x: u32, y: u32) -> [u8; 3] {
        debug_assert!(x < self.width && y < self.height);
        let offset = self.layout.pixel_offset(x, y);
        let [r, g, b] = self.layout.rgb_offsets;
        debug_assert!(offset + self.layout.pixel_size <= self.buffer.len());
        // Safety: the whole image lies inside the buffer (checked by `acquire()`)
        // and callers pass coordinates inside the image.
        unsafe {
            [
                *self.buffer.get_unchecked(offset + r),
                *self.buffer.get_unchecked(offset + g),
                *self.buffer.get_unchecked(offset + b),
            ]
        }
    }
}

/// Write-only mapping of the destination image.
#[derive(Debug)]
pub(crate) struct LockedDst<'a> {
    rows: DstRows<'a>,
    height: u32,
}

impl<'a> LockedDst<'a> {
    pub fn acquire(image: &'a mut Image<'_>) -> Result<Self, BufferAccessError> {
        let layout = Layout::map(&*image, image.buffer().len())?;
        let (width, height) = (image.width(), image.height());
        test_log!("acquire destination buffer lock");
        Ok(Self {
            rows: DstRows {
                buffer: image.buffer_mut(),
                layout,
                width,
                first_row: 0,
                rows_count: height,
            },
            height,
        })
    }

    /// All rows of the image.
    pub fn rows(&mut self) -> &mut DstRows<'a> {
        &mut self.rows
    }

    /// Splits the image into bands of consecutive rows that don't overlap.
    pub fn split_by_height(&mut self, num_parts: u32) -> Vec<DstRows<'_>> {
        let height = self.height;
        let num_parts = num_parts.clamp(1, height.max(1));
        let part_height = height.div_ceil(num_parts);
        let layout = self.rows.layout;
        let width = self.rows.width;

        let mut parts = Vec::with_capacity(num_parts as usize);
        let mut rest: &mut [u8] = &mut *self.rows.buffer;
        let mut first_row = 0;
        while first_row < height {
            let rows_count = part_height.min(height - first_row);
            let part_size = if first_row + rows_count < height {
                rows_count as usize * layout.stride
            } else {
                rest.len()
            };
            let (part, tail) = std::mem::take(&mut rest).split_at_mut(part_size);
            rest = tail;
            parts.push(DstRows {
                buffer: part,
                layout,
                width,
                first_row,
                rows_count,
            });
            first_row += rows_count;
        }
        parts
    }
}

impl Drop for LockedDst<'_> {
    fn drop(&mut self) {
        test_log!("release destination buffer lock");
    }
}

/// Consecutive rows of the locked destination image.
#[derive(Debug)]
pub(crate) struct DstRows<'a> {
    buffer: &'a mut [u8],
    layout: Layout,
    width: u32,
    first_row: u32,
    rows_count: u32,
}

impl DstRows<'_> {
    /// Range of image rows covered by this part.
    pub fn rows_range(&self) -> std::ops::Range<u32> {
        self.first_row..self.first_row + self.rows_count
    }
}

impl WriteRgb for DstRows<'_> {
    #[inline(always)]
    fn write_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        debug_assert!(x < self.width && self.rows_range().contains(&y));
        let offset = self.layout.pixel_offset(x, y - self.first_row);
        let [r, g, b] = self.layout.rgb_offsets;
        debug_assert!(offset + self.layout.pixel_size <= self.buffer.len());
        // Safety: the rows lie inside the buffer (checked by `LockedDst::acquire()`)
        // and callers pass coordinates inside these rows.
        unsafe {
            *self.buffer.get_unchecked_mut(offset + r) = rgb[0];
            *self.buffer.get_unchecked_mut(offset + g) = rgb[1];
            *self.buffer.get_unchecked_mut(offset + b) = rgb[2];
        }
    }
}
