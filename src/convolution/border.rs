/// Clamp-to-edge: out-of-range sample index is replaced by index
/// of the nearest edge pixel.
///
/// `len` must be greater than zero.
#[inline(always)]
pub(crate) fn clamp_to_edge(index: i64, len: u32) -> u32 {
    debug_assert!(len > 0);
    index.clamp(0, len as i64 - 1) as u32
}
