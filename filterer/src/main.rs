use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use image::{ColorType, ImageReader, RgbImage};
use log::{debug, info};
use matrix_filter as mf;
use matrix_filter::benchmark::{run_benchmark, BenchmarkReport};
use matrix_filter::images::Image;

mod structs;

#[derive(Parser)]
#[clap(version, about, long_about = None)]
#[clap(disable_help_flag = true)]
struct Cli {
    #[clap(long, action = clap::ArgAction::HelpLong)]
    help: Option<bool>,

    /// Path to source image file
    #[clap(value_parser)]
    source_path: PathBuf,

    /// Directory for result images [default: directory of the source image]
    #[clap(short, long, value_parser)]
    out_dir: Option<PathBuf>,

    /// Side of the square kernel, must be odd
    #[clap(short = 'k', long, value_parser, default_value_t = 3)]
    kernel_size: u32,

    /// Type of the kernel
    #[clap(long, value_enum, default_value_t = structs::KernelType::Gaussian)]
    kernel: structs::KernelType,

    /// Strategy used to filter image; may be repeated [default: all in order
    /// accessor, direct, parallel]
    #[clap(short, long, value_enum)]
    strategy: Vec<structs::Strategy>,

    /// Count of threads used by the parallel strategy [default: count of CPUs]
    #[clap(short, long, value_parser)]
    threads: Option<usize>,

    /// Overwrite destination files
    #[clap(long, action)]
    overwrite: bool,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<()> {
    let cli: Cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();
    match cli.threads {
        Some(num_threads) => {
            debug!("Create thread pool with {} threads", num_threads);
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .with_context(|| "Failed to create thread pool")?;
            pool.install(|| filter(&cli))
        }
        None => filter(&cli),
    }
}

fn filter(cli: &Cli) -> Result<()> {
    let src_image = open_source_image(&cli.source_path)?;
    println!("h = {} w = {}", src_image.height(), src_image.width());

    let kernel = mf::Kernel::build(cli.kernel.into(), cli.kernel_size)
        .with_context(|| format!("Failed to build kernel with size {}", cli.kernel_size))?;
    let filter = mf::MatrixFilter::new(kernel);

    let strategies = selected_strategies(cli);
    // Check destinations before the long filtering.
    let result_paths = strategies
        .iter()
        .map(|&strategy| result_path(cli, strategy))
        .collect::<Result<Vec<_>>>()?;

    let filter_strategies: Vec<mf::FilterStrategy> =
        strategies.iter().map(|&strategy| strategy.into()).collect();
    debug!(
        "Filter the source image by {:?} kernel {}x{}",
        cli.kernel, cli.kernel_size, cli.kernel_size
    );
    let report = run_benchmark(&filter, &src_image, &filter_strategies)
        .with_context(|| "Failed to filter image")?;
    print_report(&report);

    for (run, path) in report.runs.iter().zip(&result_paths) {
        save_result(&run.image, path)?;
    }
    Ok(())
}

fn selected_strategies(cli: &Cli) -> Vec<structs::Strategy> {
    if cli.strategy.is_empty() {
        vec![
            structs::Strategy::Accessor,
            structs::Strategy::Direct,
            structs::Strategy::Parallel,
        ]
    } else {
        cli.strategy.clone()
    }
}

fn open_source_image(source_path: &Path) -> Result<RgbImage> {
    debug!("Opening the source image {:?}", source_path);
    let image = ImageReader::open(source_path)
        .with_context(|| format!("Failed to read source file from {:?}", source_path))?
        .decode()
        .with_context(|| "Failed to decode source image")?;
    Ok(image.to_rgb8())
}

fn print_report(report: &BenchmarkReport) {
    for run in &report.runs {
        let ms = run.elapsed.as_secs_f64() * 1000.;
        info!("{} strategy has finished", run.strategy);
        println!("{} time = {}ms", run.strategy, ms);
    }
    if let Some(speedup) = report.speedup(
        mf::FilterStrategy::DirectBuffer,
        mf::FilterStrategy::DirectBufferParallel,
    ) {
        println!("SpeedUp = {:.2}", speedup);
    }
    if !report.outputs_are_identical() {
        log::warn!("Strategies have produced different images");
    }
}

fn result_path(cli: &Cli, strategy: structs::Strategy) -> Result<PathBuf> {
    let dir = match &cli.out_dir {
        Some(dir) => dir.clone(),
        None => cli
            .source_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let stem = cli
        .source_path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("result");
    let path = dir.join(format!(
        "{}_{}_filter({}).png",
        stem,
        strategy.file_suffix(),
        cli.kernel_size
    ));
    if path.exists() && !cli.overwrite {
        return Err(anyhow!("Destination path {:?} already exists.", path));
    }
    Ok(path)
}

fn save_result(image: &Image, path: &Path) -> Result<()> {
    debug!("Save the result image into the file {:?}", path);
    image::save_buffer(
        path,
        image.buffer(),
        image.width(),
        image.height(),
        ColorType::Rgb8,
    )
    .with_context(|| format!("Failed to save the result image into {:?}", path))
}
