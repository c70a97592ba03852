use rayon::current_num_threads;
use rayon::prelude::*;

use crate::convolution::Convolver;
use crate::locked_buffer::{LockedDst, LockedSrc};

/// Convolves bands of destination rows in the current `rayon` thread pool.
/// Returns after all bands have been processed.
pub(crate) fn convolve_by_bands(convolver: &Convolver, src: &LockedSrc, dst: &mut LockedDst) {
    let max_num_parts = calculate_max_h_parts_number(
        convolver.width(),
        convolver.height(),
        convolver.kernel_side(),
    );
    let num_threads = current_num_threads() as u32;
    let num_parts = num_threads.min(max_num_parts).max(1);
    test_log!(&format!("split destination into {num_parts} bands"));

    dst.split_by_height(num_parts)
        .into_par_iter()
        .for_each(|mut band| {
            let rows = band.rows_range();
            convolver.convolve_rows(src, &mut band, rows);
        });
}

/// It is not optimal to split images on too small parts.
/// Minimal height of one part is chosen so that it
/// requires about `1 << 14` reads of source pixels.
fn calculate_max_h_parts_number(width: u32, height: u32, kernel_side: u32) -> u32 {
    if width == 0 || height == 0 {
        return 1;
    }
    let reads_per_row = width as u64 * kernel_side as u64 * kernel_side as u64;
    let min_height = ((1u64 << 14) / reads_per_row.max(1)).max(1);
    (height as u64 / min_height).clamp(1, height as u64) as u32
}
