//! Containers of image data.
use std::fmt::Debug;

pub use self::image::*;

use crate::{DimensionMismatchError, PixelType};

mod image;

#[cfg(feature = "image")]
mod image_crate;

#[derive(Debug)]
enum BufferContainer<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferContainer<'_, T> {
    fn as_vec(&self) -> Vec<T> {
        match self {
            Self::Borrowed(slice) => slice.to_vec(),
            Self::Owned(vec) => vec.clone(),
        }
    }

    fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    fn borrow_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

/// Size of buffer in bytes required to hold an image with the given geometry.
/// The last row isn't required to be padded up to the stride.
pub(crate) fn required_buffer_size(
    width: u32,
    height: u32,
    stride: usize,
    pixel_type: PixelType,
) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }
    let row_size = (width as usize).checked_mul(pixel_type.size())?;
    stride
        .checked_mul(height as usize - 1)?
        .checked_add(row_size)
}

pub(crate) fn check_buffer_geometry(
    width: u32,
    height: u32,
    stride: usize,
    pixel_type: PixelType,
    buffer_len: usize,
) -> Result<(), DimensionMismatchError> {
    let row_size = (width as usize).saturating_mul(pixel_type.size());
    if stride < row_size {
        return Err(DimensionMismatchError::StrideTooSmall);
    }
    match required_buffer_size(width, height, stride, pixel_type) {
        Some(size) if size <= buffer_len => Ok(()),
        _ => Err(DimensionMismatchError::InvalidBufferSize),
    }
}
