use std::env;
use std::path::PathBuf;

use criterion::measurement::WallTime;
use criterion::{Bencher, BenchmarkGroup, BenchmarkId, Criterion};
use matrix_filter::{Image, PixelType};

pub struct BenchGroup<'a> {
    pub criterion_group: BenchmarkGroup<'a, WallTime>,
}

pub fn run_bench<F>(bench_fn: F, name: &str)
where
    F: FnOnce(&mut BenchGroup),
{
    let mut criterion = Criterion::default()
        .output_directory(&criterion_output_directory())
        .configure_from_args();
    let mut group = BenchGroup {
        criterion_group: criterion.benchmark_group(name),
    };
    bench_fn(&mut group);
    group.criterion_group.finish();
    criterion.final_summary();
}

pub fn bench<S1, S2, F>(
    group: &mut BenchGroup,
    sample_size: usize,
    func_name: S1,
    parameter: S2,
    mut f: F,
) where
    S1: Into<String>,
    S2: Into<String>,
    F: FnMut(&mut Bencher),
{
    let parameter = parameter.into();
    group.criterion_group.sample_size(sample_size);
    group.criterion_group.bench_with_input(
        BenchmarkId::new(func_name.into(), &parameter),
        &parameter,
        |bencher, _| f(bencher),
    );
}

/// Image with a non-uniform content, so that the work of the filter
/// doesn't depend on caching of repeated values.
pub fn source_image(width: u32, height: u32, pixel_type: PixelType) -> Image<'static> {
    let pixel_size = pixel_type.size();
    let mut buffer = vec![0u8; width as usize * height as usize * pixel_size];
    for (i, pixel) in buffer.chunks_exact_mut(pixel_size).enumerate() {
        let (x, y) = (i % width as usize, i / width as usize);
        for (c, v) in pixel.iter_mut().enumerate() {
            *v = ((x * 31 + y * 17 + c * 7) % 256) as u8;
        }
    }
    Image::from_vec_u8(width, height, buffer, pixel_type).unwrap()
}

fn criterion_output_directory() -> PathBuf {
    if let Some(value) = env::var_os("CRITERION_HOME") {
        PathBuf::from(value)
    } else {
        PathBuf::from("target/criterion")
    }
}
