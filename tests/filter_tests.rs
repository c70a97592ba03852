use std::cell::Cell;

use matrix_filter::{
    DimensionMismatchError, FilterError, FilterStrategy, Image, ImageRef, ImageView,
    InvalidKernelError, Kernel, MatrixFilter, PixelAccessor, PixelAccessorMut, PixelType,
    RgbColor, UnsupportedPixelFormatError,
};

use crate::utils::{
    apply_all_strategies, pattern_image, pattern_image_with_stride, rgb_image, rgb_pixels,
    RGB_PIXEL_TYPES,
};

mod utils;

fn test_kernels() -> Vec<Kernel> {
    vec![
        Kernel::identity(),
        Kernel::gaussian(3).unwrap(),
        Kernel::gaussian(5).unwrap(),
        Kernel::box_blur(3).unwrap(),
        Kernel::box_blur(7).unwrap(),
        // Not symmetric and not normalized.
        Kernel::from_fn(3, |a, b| (a * 3 + b) as f64 * 0.05),
    ]
}

#[test]
fn strategies_produce_identical_images() {
    let sizes = [(1, 1), (2, 3), (7, 5), (33, 17)];
    for pixel_type in RGB_PIXEL_TYPES {
        for (width, height) in sizes {
            let src_image = pattern_image(width, height, pixel_type);
            for kernel in test_kernels() {
                let filter = MatrixFilter::new(kernel);
                apply_all_strategies(&filter, &src_image);
            }
        }
    }
}

#[test]
fn result_has_dimensions_of_source() {
    for pixel_type in RGB_PIXEL_TYPES {
        let src_image = pattern_image_with_stride(13, 9, 13 * pixel_type.size() + 5, pixel_type);
        let filter = MatrixFilter::new(Kernel::gaussian(5).unwrap());
        for strategy in FilterStrategy::ALL {
            let dst_image = filter.apply(&src_image, strategy).unwrap();
            assert_eq!(dst_image.width(), 13);
            assert_eq!(dst_image.height(), 9);
            assert_eq!(dst_image.pixel_type(), pixel_type);
            assert_eq!(dst_image.stride(), 13 * pixel_type.size());
        }
    }
}

#[test]
fn padding_of_rows_does_not_change_result() {
    let filter = MatrixFilter::new(Kernel::gaussian(5).unwrap());
    for pixel_type in RGB_PIXEL_TYPES {
        let tight_image = pattern_image(21, 11, pixel_type);
        let padded_image =
            pattern_image_with_stride(21, 11, 21 * pixel_type.size() + 7, pixel_type);
        let expected = apply_all_strategies(&filter, &tight_image);
        let result = apply_all_strategies(&filter, &padded_image);
        assert_eq!(result.buffer(), expected.buffer());
    }
}

#[test]
fn source_may_be_image_ref() {
    let image = pattern_image(10, 8, PixelType::U8x3);
    let image_ref = ImageRef::new(10, 8, image.buffer(), PixelType::U8x3).unwrap();
    let filter = MatrixFilter::new(Kernel::box_blur(3).unwrap());
    let expected = apply_all_strategies(&filter, &image);
    let result = apply_all_strategies(&filter, &image_ref);
    assert_eq!(result.buffer(), expected.buffer());
}

#[test]
fn channel_order_of_pixel_type_is_respected() {
    let filter = MatrixFilter::new(Kernel::gaussian(3).unwrap());
    let rgb_src = pattern_image(9, 6, PixelType::U8x3);
    let expected = rgb_pixels(&apply_all_strategies(&filter, &rgb_src));

    for pixel_type in [PixelType::U8x3Bgr, PixelType::U8x4, PixelType::U8x4Bgra] {
        let mut src_image = Image::new(9, 6, pixel_type);
        for y in 0..6 {
            for x in 0..9 {
                let color = rgb_src.get_pixel(x, y);
                src_image.set_pixel(x, y, color);
            }
        }
        let dst_image = apply_all_strategies(&filter, &src_image);
        assert_eq!(rgb_pixels(&dst_image), expected, "{pixel_type:?}");
    }
}

#[test]
fn bgr_channels_are_written_in_reversed_order() {
    let src_image = Image::from_vec_u8(1, 1, vec![10, 20, 30], PixelType::U8x3Bgr).unwrap();
    let filter = MatrixFilter::new(Kernel::identity());
    let dst_image = apply_all_strategies(&filter, &src_image);
    assert_eq!(dst_image.buffer(), &[10, 20, 30]);
    assert_eq!(dst_image.get_pixel(0, 0), RgbColor::new(30, 20, 10));
}

#[test]
fn alpha_channel_of_result_is_zero() {
    let filter = MatrixFilter::new(Kernel::gaussian(3).unwrap());
    for pixel_type in [PixelType::U8x4, PixelType::U8x4Bgra] {
        let mut src_image = pattern_image(8, 8, pixel_type);
        src_image.buffer_mut().chunks_exact_mut(4).for_each(|p| p[3] = 255);
        for strategy in FilterStrategy::ALL {
            let dst_image = filter.apply(&src_image, strategy).unwrap();
            assert!(dst_image.buffer().chunks_exact(4).all(|p| p[3] == 0));
        }
    }
}

#[test]
fn identity_kernel_keeps_image() {
    let filter = MatrixFilter::new(Kernel::identity());
    for pixel_type in [PixelType::U8x3, PixelType::U8x3Bgr] {
        let src_image = pattern_image(17, 13, pixel_type);
        let dst_image = apply_all_strategies(&filter, &src_image);
        assert_eq!(dst_image.buffer(), src_image.buffer());
    }
}

#[test]
fn single_pixel_is_clamped_to_itself() {
    let mut kernel = Kernel::new(3, vec![1., 2., 1., 2., 4., 2., 1., 2., 1.]).unwrap();
    kernel.normalize().unwrap();
    let filter = MatrixFilter::new(kernel);
    for color in [[0, 0, 0], [1, 128, 255], [77, 3, 200]] {
        let src_image = rgb_image(1, 1, &[color]);
        let dst_image = apply_all_strategies(&filter, &src_image);
        assert_eq!(dst_image.buffer(), &color);
    }
}

#[test]
fn bright_pixel_in_center() {
    let mut pixels = [[0u8; 3]; 9];
    pixels[4] = [255, 255, 255];
    let src_image = rgb_image(3, 3, &pixels);
    let filter = MatrixFilter::new(Kernel::box_blur(3).unwrap());
    let dst_image = apply_all_strategies(&filter, &src_image);
    // Every window contains the center pixel exactly once: 255 / 9 = 28.33
    assert_eq!(rgb_pixels(&dst_image), vec![[28, 28, 28]; 9]);
}

#[test]
fn bright_pixel_in_corner() {
    let mut pixels = [[0u8; 3]; 9];
    pixels[0] = [255, 255, 255];
    let src_image = rgb_image(3, 3, &pixels);
    let filter = MatrixFilter::new(Kernel::box_blur(3).unwrap());
    let dst_image = apply_all_strategies(&filter, &src_image);

    // The corner pixel is repeated by clamping of out-of-range samples.
    let expected: Vec<[u8; 3]> = [113, 56, 0, 56, 28, 0, 0, 0, 0]
        .iter()
        .map(|&v| [v; 3])
        .collect();
    assert_eq!(rgb_pixels(&dst_image), expected);
}

#[test]
fn kernel_column_samples_image_column() {
    // Non-zero weights only in the column of the matrix with a = radius,
    // so all samples are taken from the column of the output pixel.
    let kernel = Kernel::from_fn(3, |a, _| if a == 1 { 1. / 3. } else { 0. });
    let pixels: Vec<[u8; 3]> = (0..9)
        .map(|i| if i % 3 == 1 { [150; 3] } else { [0; 3] })
        .collect();
    let src_image = rgb_image(3, 3, &pixels);
    let dst_image = apply_all_strategies(&MatrixFilter::new(kernel), &src_image);

    for (i, pixel) in rgb_pixels(&dst_image).iter().enumerate() {
        if i % 3 == 1 {
            // Sum of three weights may be slightly less than one.
            assert!(pixel[0] == 149 || pixel[0] == 150, "{pixel:?}");
        } else {
            assert_eq!(pixel, &[0; 3]);
        }
    }
}

#[test]
fn accumulated_value_is_truncated_and_wrapped() {
    let src_image = rgb_image(1, 1, &[[200, 5, 127]]);

    let filter = MatrixFilter::new(Kernel::new(1, vec![2.]).unwrap());
    let dst_image = apply_all_strategies(&filter, &src_image);
    // 400 -> 144, 10 -> 10, 254 -> 254
    assert_eq!(dst_image.buffer(), &[144, 10, 254]);

    let filter = MatrixFilter::new(Kernel::new(1, vec![-1.]).unwrap());
    let dst_image = apply_all_strategies(&filter, &src_image);
    // -200 -> 56, -5 -> 251, -127 -> 129
    assert_eq!(dst_image.buffer(), &[56, 251, 129]);

    let filter = MatrixFilter::new(Kernel::new(1, vec![0.999]).unwrap());
    let dst_image = apply_all_strategies(&filter, &src_image);
    // 199.8 -> 199, 4.995 -> 4, 126.873 -> 126
    assert_eq!(dst_image.buffer(), &[199, 4, 126]);
}

#[test]
fn parallel_result_is_deterministic() {
    let src_image = pattern_image(203, 151, PixelType::U8x4);
    let filter = MatrixFilter::new(Kernel::gaussian(7).unwrap());
    let expected = filter.apply(&src_image, FilterStrategy::DirectBuffer).unwrap();

    for _ in 0..5 {
        let dst_image = filter
            .apply(&src_image, FilterStrategy::DirectBufferParallel)
            .unwrap();
        assert_eq!(dst_image.buffer(), expected.buffer());
    }

    for num_threads in 1..=8 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .unwrap();
        let dst_image = pool
            .install(|| filter.apply(&src_image, FilterStrategy::DirectBufferParallel))
            .unwrap();
        assert_eq!(
            dst_image.buffer(),
            expected.buffer(),
            "Result with {num_threads} threads"
        );
    }
}

#[test]
fn tall_and_wide_images() {
    let filter = MatrixFilter::new(Kernel::gaussian(5).unwrap());
    for (width, height) in [(1, 300), (300, 1), (2, 2)] {
        let src_image = pattern_image(width, height, PixelType::U8x3);
        apply_all_strategies(&filter, &src_image);
    }
}

fn assert_error_for_all_strategies(
    filter: &MatrixFilter,
    src_image: &impl ImageView,
    expected: FilterError,
) {
    for strategy in FilterStrategy::ALL {
        assert_eq!(
            filter.apply(src_image, strategy).unwrap_err(),
            expected,
            "Strategy '{strategy}'"
        );
    }
}

#[test]
fn invalid_kernel_is_rejected() {
    let src_image = pattern_image(4, 4, PixelType::U8x3);

    let filter = MatrixFilter::new(Kernel::new(4, vec![1. / 16.; 16]).unwrap());
    assert_error_for_all_strategies(
        &filter,
        &src_image,
        InvalidKernelError::EvenSize(4).into(),
    );

    let filter = MatrixFilter::new(Kernel::new(0, vec![]).unwrap());
    assert_error_for_all_strategies(&filter, &src_image, InvalidKernelError::ZeroSize.into());
}

#[test]
fn pixel_types_without_color_are_rejected() {
    let filter = MatrixFilter::new(Kernel::gaussian(3).unwrap());
    for pixel_type in [PixelType::U8, PixelType::U8x2] {
        let src_image = Image::new(4, 4, pixel_type);
        assert_error_for_all_strategies(
            &filter,
            &src_image,
            UnsupportedPixelFormatError::NotEnoughColorChannels(pixel_type).into(),
        );
    }
}

#[test]
fn kernel_is_checked_before_pixel_type() {
    let filter = MatrixFilter::new(Kernel::new(2, vec![0.25; 4]).unwrap());
    let src_image = Image::new(4, 4, PixelType::U8);
    assert_error_for_all_strategies(
        &filter,
        &src_image,
        InvalidKernelError::EvenSize(2).into(),
    );
}

#[test]
fn empty_image_is_rejected() {
    let filter = MatrixFilter::new(Kernel::gaussian(3).unwrap());
    for (width, height) in [(0, 5), (5, 0), (0, 0)] {
        let src_image = Image::new(width, height, PixelType::U8x3);
        assert_error_for_all_strategies(
            &filter,
            &src_image,
            DimensionMismatchError::ZeroDimensions.into(),
        );
    }
}

struct CustomView {
    width: u32,
    height: u32,
    stride: usize,
    buffer: Vec<u8>,
}

impl ImageView for CustomView {
    fn pixel_type(&self) -> PixelType {
        PixelType::U8x3
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
        &self.buffer
    }
}

#[test]
fn inconsistent_image_view_is_rejected() {
    let filter = MatrixFilter::new(Kernel::gaussian(3).unwrap());

    let short_buffer = CustomView {
        width: 4,
        height: 4,
        stride: 12,
        buffer: vec![0; 12 * 3 + 11],
    };
    assert_error_for_all_strategies(
        &filter,
        &short_buffer,
        DimensionMismatchError::InvalidBufferSize.into(),
    );

    let small_stride = CustomView {
        width: 4,
        height: 4,
        stride: 11,
        buffer: vec![0; 12 * 4],
    };
    assert_error_for_all_strategies(
        &filter,
        &small_stride,
        DimensionMismatchError::StrideTooSmall.into(),
    );
}

#[test]
fn custom_image_view_without_padding_of_last_row() {
    let image = pattern_image_with_stride(5, 3, 20, PixelType::U8x3);
    let mut buffer = image.buffer().to_vec();
    // The last row doesn't need to be padded up to the stride.
    buffer.truncate(20 * 2 + 15);
    let view = CustomView {
        width: 5,
        height: 3,
        stride: 20,
        buffer,
    };
    let filter = MatrixFilter::new(Kernel::gaussian(3).unwrap());
    let expected = apply_all_strategies(&filter, &image);
    let result = apply_all_strategies(&filter, &view);
    assert_eq!(result.buffer(), expected.buffer());
}

/// View that reports a different geometry after the first call
/// of `width()` and `buffer()`.
struct ChangingView {
    buffer: Vec<u8>,
    width_calls: Cell<u32>,
    buffer_calls: Cell<u32>,
}

impl ChangingView {
    fn new() -> Self {
        Self {
            buffer: (0..192).map(|v| v as u8).collect(),
            width_calls: Cell::new(0),
            buffer_calls: Cell::new(0),
        }
    }
}

impl ImageView for ChangingView {
    fn pixel_type(&self) -> PixelType {
        PixelType::U8x3
    }

    fn width(&self) -> u32 {
        self.width_calls.set(self.width_calls.get() + 1);
        if self.width_calls.get() == 1 {
            64
        } else {
            1
        }
    }

    fn height(&self) -> u32 {
        1
    }

    fn stride(&self) -> usize {
        192
    }

    fn buffer(&self) -> &[u8] {
        self.buffer_calls.set(self.buffer_calls.get() + 1);
        if self.buffer_calls.get() == 1 {
            &self.buffer
        } else {
            &self.buffer[..3]
        }
    }
}

#[test]
fn geometry_of_source_is_read_once() {
    let filter = MatrixFilter::new(Kernel::identity());
    for strategy in FilterStrategy::ALL {
        let view = ChangingView::new();
        let dst_image = filter.apply(&view, strategy).unwrap();
        assert_eq!(view.width_calls.get(), 1, "{strategy}");
        assert_eq!(view.buffer_calls.get(), 1, "{strategy}");
        assert_eq!(dst_image.width(), 64);
        assert_eq!(dst_image.height(), 1);
        assert_eq!(dst_image.buffer(), view.buffer.as_slice(), "{strategy}");
    }
}
