use image::{DynamicImage, ImageBuffer, RgbImage, RgbaImage};

use crate::images::ImageRef;
use crate::{FilterError, ImageView, PixelType, UnsupportedPixelFormatError};

macro_rules! impl_for_img_buffer {
    ($img_type:tt, $pixel_type:expr) => {
        impl ImageView for $img_type {
            fn pixel_type(&self) -> PixelType {
                $pixel_type
            }

            fn width(&self) -> u32 {
                ImageBuffer::width(self)
            }

            fn height(&self) -> u32 {
                ImageBuffer::height(self)
            }

            fn stride(&self) -> usize {
                ImageBuffer::width(self) as usize * $pixel_type.size()
            }

            fn buffer(&self) -> &[u8] {
                self.as_raw()
            }
        }
    };
}

impl_for_img_buffer!(RgbImage, PixelType::U8x3);
impl_for_img_buffer!(RgbaImage, PixelType::U8x4);

impl<'a> TryFrom<&'a DynamicImage> for ImageRef<'a> {
    type Error = FilterError;

    fn try_from(image: &'a DynamicImage) -> Result<Self, Self::Error> {
        let pixel_type = match image {
            DynamicImage::ImageLuma8(_) => PixelType::U8,
            DynamicImage::ImageLumaA8(_) => PixelType::U8x2,
            DynamicImage::ImageRgb8(_) => PixelType::U8x3,
            DynamicImage::ImageRgba8(_) => PixelType::U8x4,
            _ => return Err(UnsupportedPixelFormatError::UnsupportedComponentType.into()),
        };
        let image_ref =
            ImageRef::new(image.width(), image.height(), image.as_bytes(), pixel_type)?;
        Ok(image_ref)
    }
}
