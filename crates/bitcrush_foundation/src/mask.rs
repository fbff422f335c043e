/// Widest field any codec reads or writes in one call.
pub const MAX_BITS: usize = 64;

/// `bits` low-order ones. `mask(0) == 0` and `mask(64) == u64::MAX`.
#[inline(always)]
pub const fn mask(bits: usize) -> u64 {
    if bits == 0 { 0 } else { u64::MAX >> (MAX_BITS - bits) }
}

/// Panics when `bits` is not a valid field width. A width above 64 can only
/// come from a caller bug, never from wire data.
#[inline(always)]
#[track_caller]
pub fn check_bit_count(bits: usize) {
    assert!(bits <= MAX_BITS, "bit count {bits} exceeds {MAX_BITS}");
}
