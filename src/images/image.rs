use crate::image_view::{pixel_range, PixelAccessorMut};
use crate::images::{check_buffer_geometry, BufferContainer};
use crate::{BufferAccessError, DimensionMismatchError, ImageView, PixelType, RgbColor};

/// Simple reference to image data that provides [ImageView].
#[derive(Debug, Copy, Clone)]
pub struct ImageRef<'a> {
    width: u32,
    height: u32,
    stride: usize,
    buffer: &'a [u8],
    pixel_type: PixelType,
}

impl<'a> ImageRef<'a> {
    /// Create an image from slice with pixels data without gaps between rows.
    pub fn new(
        width: u32,
        height: u32,
        buffer: &'a [u8],
        pixel_type: PixelType,
    ) -> Result<Self, DimensionMismatchError> {
        let stride = width as usize * pixel_type.size();
        Self::with_stride(width, height, stride, buffer, pixel_type)
    }

    /// Create an image from slice with pixels data where rows start
    /// every `stride` bytes.
    pub fn with_stride(
        width: u32,
        height: u32,
        stride: usize,
        buffer: &'a [u8],
        pixel_type: PixelType,
    ) -> Result<Self, DimensionMismatchError> {
        check_buffer_geometry(width, height, stride, pixel_type, buffer.len())?;
        Ok(Self {
            width,
            height,
            stride,
            buffer,
            pixel_type,
        })
    }

    #[inline]
    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Buffer with image pixels data.
    #[inline]
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.buffer.into()
    }
}

impl ImageView for ImageRef<'_> {
    fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stride(&self) -> usize {
        self.stride
    }

    fn buffer(&self) -> &[u8] {
        self.buffer
    }
}

/// Simple container of image data that provides [ImageView] and
/// [PixelAccessorMut].
#[derive(Debug)]
pub struct Image<'a> {
    width: u32,
    height: u32,
    stride: usize,
    buffer: BufferContainer<'a, u8>,
    pixel_type: PixelType,
}

impl Image<'static> {
    /// Create an empty image with given dimensions and pixel type.
    ///
    /// # Panics
    ///
    /// If size of the buffer overflows `usize` or the buffer
    /// can't be allocated.
    pub fn new(width: u32, height: u32, pixel_type: PixelType) -> Self {
        match Self::try_new(width, height, pixel_type) {
            Ok(image) => image,
            Err(err) => panic!("Failed to create image {width}x{height}: {err}"),
        }
    }

    /// Same as [Image::new], but reports failure of allocation instead of aborting.
    pub(crate) fn try_new(
        width: u32,
        height: u32,
        pixel_type: PixelType,
    ) -> Result<Self, BufferAccessError> {
        let stride = (width as usize)
            .checked_mul(pixel_type.size())
            .ok_or(BufferAccessError::AddressOverflow)?;
        let size = stride
            .checked_mul(height as usize)
            .ok_or(BufferAccessError::AddressOverflow)?;
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(size)
            .map_err(|_| BufferAccessError::AllocationFailed)?;
        buffer.resize(size, 0);
        Ok(Self {
            width,
            height,
            stride,
            buffer: BufferContainer::Owned(buffer),
            pixel_type,
        })
    }

    /// Create an image from vector with pixels data without gaps between rows.
    pub fn from_vec_u8(
        width: u32,
        height: u32,
        buffer: Vec<u8>,
        pixel_type: PixelType,
    ) -> Result<Self, DimensionMismatchError> {
        let stride = width as usize * pixel_type.size();
        Self::from_vec_u8_with_stride(width, height, stride, buffer, pixel_type)
    }

    /// Create an image from vector with pixels data where rows start
    /// every `stride` bytes.
    pub fn from_vec_u8_with_stride(
        width: u32,
        height: u32,
        stride: usize,
        buffer: Vec<u8>,
        pixel_type: PixelType,
    ) -> Result<Self, DimensionMismatchError> {
        check_buffer_geometry(width, height, stride, pixel_type, buffer.len())?;
        Ok(Self {
            width,
            height,
            stride,
            buffer: BufferContainer::Owned(buffer),
            pixel_type,
        })
    }
}

impl<'a> Image<'a> {
    /// Create an image from slice with pixels data without gaps between rows.
    pub fn from_slice_u8(
        width: u32,
        height: u32,
        buffer: &'a mut [u8],
        pixel_type: PixelType,
    ) -> Result<Self, DimensionMismatchError> {
        let stride = width as usize * pixel_type.size();
        Self::from_slice_u8_with_stride(width, height, stride, buffer, pixel_type)
    }

    pub fn from_slice_u8_with_stride(
        width: u32,
        height: u32,
        stride: usize,
        buffer: &'a mut [u8],
        pixel_type: PixelType,
    ) -> Result<Self, DimensionMismatchError> {
        check_buffer_geometry(width, height, stride, pixel_type, buffer.len())?;
        Ok(Self {
            width,
            height,
            stride,
            buffer: BufferContainer::Borrowed(buffer),
            pixel_type,
        })
    }

    #[inline]
    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Buffer with image pixels data.
    #[inline]
    pub fn buffer(&self) -> &[u8] {
        self.buffer.borrow()
    }

    /// Mutable buffer with image pixels data.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        self.buffer.borrow_mut()
    }

    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        match self.buffer {
            BufferContainer::Borrowed(p) => p.into(),
            BufferContainer::Owned(v) => v,
        }
    }

    /// Creates a copy of the image.
    pub fn copy(&self) -> Image<'static> {
        Image {
            width: self.width,
            height: self.height,
            stride: self.stride,
            buffer: BufferContainer::Owned(self.buffer.as_vec()),
            pixel_type: self.pixel_type,
        }
    }

    /// Get the read-only reference to the image.
    pub fn image_ref(&self) -> ImageRef<'_> {
        ImageRef {
            width: self.width,
            height: self.height,
            stride: self.stride,
            buffer: self.buffer(),
            pixel_type: self.pixel_type,
        }
    }
}

impl ImageView for Image<'_> {
    fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stride(&self) -> usize {
        self.stride
    }

    fn buffer(&self) -> &[u8] {
        self.buffer.borrow()
    }
}

impl PixelAccessorMut for Image<'_> {
    fn set_pixel(&mut self, x: u32, y: u32, color: RgbColor) {
        let pixel_type = self.pixel_type;
        let range = pixel_range(x, y, self.width, self.height, self.stride, pixel_type);
        let pixel = &mut self.buffer_mut()[range];
        let [r, g, b] = pixel_type.rgb_offsets();
        pixel[r] = color.r;
        pixel[g] = color.g;
        pixel[b] = color.b;
    }
}
