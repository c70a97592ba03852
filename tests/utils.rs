use matrix_filter::{FilterStrategy, Image, ImageView, MatrixFilter, PixelAccessor, PixelType};

pub const RGB_PIXEL_TYPES: [PixelType; 4] = [
    PixelType::U8x3,
    PixelType::U8x3Bgr,
    PixelType::U8x4,
    PixelType::U8x4Bgra,
];

pub fn pattern_value(x: u32, y: u32, c: usize) -> u8 {
    ((x as usize * 31 + y as usize * 17 + c * 7) % 256) as u8
}

/// Image in which every byte of a pixel depends on its position.
pub fn pattern_image(width: u32, height: u32, pixel_type: PixelType) -> Image<'static> {
    let stride = width as usize * pixel_type.size();
    pattern_image_with_stride(width, height, stride, pixel_type)
}

/// Same as [pattern_image], but rows are padded up to `stride` bytes
/// with `0xAA`.
pub fn pattern_image_with_stride(
    width: u32,
    height: u32,
    stride: usize,
    pixel_type: PixelType,
) -> Image<'static> {
    let pixel_size = pixel_type.size();
    let mut buffer = vec![0xAAu8; stride * height as usize];
    for y in 0..height {
        for x in 0..width {
            let start = y as usize * stride + x as usize * pixel_size;
            for c in 0..pixel_size {
                buffer[start + c] = pattern_value(x, y, c);
            }
        }
    }
    Image::from_vec_u8_with_stride(width, height, stride, buffer, pixel_type).unwrap()
}

/// Image `U8x3` with the given colors of pixels, row by row.
pub fn rgb_image(width: u32, height: u32, pixels: &[[u8; 3]]) -> Image<'static> {
    assert_eq!(pixels.len(), (width * height) as usize);
    let buffer = pixels.iter().flatten().copied().collect();
    Image::from_vec_u8(width, height, buffer, PixelType::U8x3).unwrap()
}

/// Colors of all pixels, row by row.
pub fn rgb_pixels(image: &impl ImageView) -> Vec<[u8; 3]> {
    let mut res = Vec::with_capacity((image.width() * image.height()) as usize);
    for y in 0..image.height() {
        for x in 0..image.width() {
            res.push(image.get_pixel(x, y).into());
        }
    }
    res
}

/// Applies the filter with every strategy and checks that results are equal.
pub fn apply_all_strategies(filter: &MatrixFilter, src_image: &impl ImageView) -> Image<'static> {
    let mut results = FilterStrategy::ALL
        .iter()
        .map(|&strategy| filter.apply(src_image, strategy).unwrap());
    let first = results.next().unwrap();
    for (image, strategy) in results.zip(&FilterStrategy::ALL[1..]) {
        assert_eq!(
            image.buffer(),
            first.buffer(),
            "Result of '{strategy}' differs from result of '{}'",
            FilterStrategy::ALL[0]
        );
    }
    first
}
