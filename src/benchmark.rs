//! Timing of filter strategies applied to the same image.
//!
//! ```
//! use matrix_filter::benchmark::run_benchmark;
//! use matrix_filter::{FilterStrategy, Image, Kernel, MatrixFilter, PixelType};
//!
//! let src_image = Image::new(64, 48, PixelType::U8x3);
//! let filter = MatrixFilter::new(Kernel::gaussian(5).unwrap());
//! let report = run_benchmark(&filter, &src_image, &FilterStrategy::ALL).unwrap();
//!
//! assert!(report.outputs_are_identical());
//! assert!(report.elapsed(FilterStrategy::DirectBuffer).is_some());
//! ```
use std::time::Duration;

use crate::{FilterError, FilterStrategy, Image, ImageView, MatrixFilter};

/// Result of one strategy.
#[derive(Debug)]
pub struct StrategyRun {
    pub strategy: FilterStrategy,
    pub elapsed: Duration,
    pub image: Image<'static>,
}

#[derive(Debug, Default)]
pub struct BenchmarkReport {
    pub runs: Vec<StrategyRun>,
}

impl BenchmarkReport {
    /// Time of the first run of the strategy.
    pub fn elapsed(&self, strategy: FilterStrategy) -> Option<Duration> {
        self.run(strategy).map(|r| r.elapsed)
    }

    pub fn run(&self, strategy: FilterStrategy) -> Option<&StrategyRun> {
        self.runs.iter().find(|r| r.strategy == strategy)
    }

    /// How many times `candidate` is faster than `baseline`.
    ///
    /// Returns `None` if one of the strategies wasn't run
    /// or `candidate` took no measurable time.
    pub fn speedup(&self, baseline: FilterStrategy, candidate: FilterStrategy) -> Option<f64> {
        let baseline = self.elapsed(baseline)?.as_secs_f64();
        let candidate = self.elapsed(candidate)?.as_secs_f64();
        (candidate > 0.).then(|| baseline / candidate)
    }

    /// Returns `true` if all runs produced images with the same pixels.
    pub fn outputs_are_identical(&self) -> bool {
        match self.runs.split_first() {
            Some((first, rest)) => rest
                .iter()
                .all(|r| r.image.buffer() == first.image.buffer()),
            None => true,
        }
    }
}

/// Applies the filter to the image with every given strategy, in order,
/// and measures wall-clock time of each call.
///
/// Stops on the first error.
pub fn run_benchmark(
    filter: &MatrixFilter,
    src_image: &impl ImageView,
    strategies: &[FilterStrategy],
) -> Result<BenchmarkReport, FilterError> {
    let mut report = BenchmarkReport::default();
    for &strategy in strategies {
        let (image, elapsed) = filter.apply_timed(src_image, strategy)?;
        report.runs.push(StrategyRun {
            strategy,
            elapsed,
            image,
        });
    }
    Ok(report)
}
