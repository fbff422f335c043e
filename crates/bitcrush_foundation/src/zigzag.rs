//! Zigzag folding: moves the sign into bit 0 so that values close to zero,
//! positive or negative, have few significant bits.
//!
//! | signed | folded |
//! |--------|--------|
//! | 0      | 0      |
//! | -1     | 1      |
//! | 1      | 2      |
//! | -2     | 3      |

#[inline(always)]
pub const fn zigzag32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

#[inline(always)]
pub const fn unzigzag32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

#[inline(always)]
pub const fn zigzag64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline(always)]
pub const fn unzigzag64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
