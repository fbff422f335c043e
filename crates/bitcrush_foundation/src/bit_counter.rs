const MULTIPLICATOR: u64 = 0x6c04_f118_e996_6f6b;

/// Indexed by the top 7 bits of `smeared * MULTIPLICATOR`, where `smeared` has
/// every bit below its highest set bit also set. Slots that no smeared value
/// can reach hold 0.
const BIT_PATTERN_TO_LOG2: [u8; 128] = [
    0, 48, 0, 0, 31, 0, 15, 51, 0, 63, 5, 0, 0, 0, 19, 0, 23, 28, 0, 0, 0, 40, 36, 46, 0,
    13, 0, 0, 0, 34, 0, 58, 0, 60, 2, 43, 55, 0, 0, 0, 50, 62, 4, 0, 18, 27, 0, 39, 45,
    0, 0, 33, 57, 0, 1, 54, 0, 49, 0, 17, 0, 0, 32, 0, 53, 0, 16, 0, 0, 52, 0, 0, 0, 64,
    6, 7, 8, 0, 9, 0, 0, 0, 20, 10, 0, 0, 24, 0, 29, 0, 0, 21, 0, 11, 0, 0, 41, 0, 25,
    37, 0, 47, 0, 30, 14, 0, 0, 0, 0, 22, 0, 0, 35, 12, 0, 0, 0, 59, 42, 0, 0, 61, 3,
    26, 38, 44, 0, 56,
];
const_assert!(lookup(0) == 0);
const_assert!(lookup(1) == 1);
const_assert!(lookup(u64::MAX) == 64);

#[inline(always)]
const fn lookup(smeared: u64) -> usize {
    BIT_PATTERN_TO_LOG2[(smeared.wrapping_mul(MULTIPLICATOR) >> 57) as usize] as usize
}

/// Number of bits needed to represent `val`, i.e. the 1-based index of its
/// highest set bit. `used_bits_u64(0) == 0`.
#[inline(always)]
pub const fn used_bits_u64(mut val: u64) -> usize {
    val |= val >> 1;
    val |= val >> 2;
    val |= val >> 4;
    val |= val >> 8;
    val |= val >> 16;
    val |= val >> 32;
    lookup(val)
}

#[inline(always)]
pub const fn used_bits_u32(mut val: u32) -> usize {
    val |= val >> 1;
    val |= val >> 2;
    val |= val >> 4;
    val |= val >> 8;
    val |= val >> 16;
    lookup(val as u64)
}

#[inline(always)]
pub const fn used_bits_u16(mut val: u16) -> usize {
    val |= val >> 1;
    val |= val >> 2;
    val |= val >> 4;
    val |= val >> 8;
    lookup(val as u64)
}

#[inline(always)]
pub const fn used_bits_u8(mut val: u8) -> usize {
    val |= val >> 1;
    val |= val >> 2;
    val |= val >> 4;
    lookup(val as u64)
}

/// Number of bytes needed to represent `val`: 0 for 0, otherwise 1..=8.
#[inline(always)]
pub const fn used_bytes_u64(val: u64) -> usize {
    if val == 0 {
        return 0;
    }

    if val & 0xFFFF_FFFF_0000_0000 != 0 {
        if val & 0xFFFF_0000_0000_0000 != 0 {
            if val & 0xFF00_0000_0000_0000 != 0 { 8 } else { 7 }
        } else if val & 0x0000_FF00_0000_0000 != 0 {
            6
        } else {
            5
        }
    } else if val & 0x0000_0000_FFFF_0000 != 0 {
        if val & 0x0000_0000_FF00_0000 != 0 { 4 } else { 3 }
    } else if val & 0x0000_0000_0000_FF00 != 0 {
        2
    } else {
        1
    }
}

#[inline(always)]
pub const fn used_bytes_u32(val: u32) -> usize {
    if val == 0 {
        return 0;
    }

    if val & 0xFFFF_0000 != 0 {
        if val & 0xFF00_0000 != 0 { 4 } else { 3 }
    } else if val & 0x0000_FF00 != 0 {
        2
    } else {
        1
    }
}

#[inline(always)]
pub const fn used_bytes_u16(val: u16) -> usize {
    if val == 0 {
        0
    } else if val & 0xFF00 != 0 {
        2
    } else {
        1
    }
}

#[inline(always)]
pub const fn used_bytes_u8(val: u8) -> usize {
    (val != 0) as usize
}

/// Method form of the `used_bits_*`/`used_bytes_*` functions, so callers
/// generic over the integer width can count without naming it.
pub trait UsedBits: Copy {
    fn used_bit_count(self) -> usize;
    fn used_byte_count(self) -> usize;
}

macro_rules! impl_used_bits {
    ($($ty:ty => $bits:ident, $bytes:ident;)*) => {
        $(
            impl UsedBits for $ty {
                #[inline(always)]
                fn used_bit_count(self) -> usize {
                    $bits(self)
                }

                #[inline(always)]
                fn used_byte_count(self) -> usize {
                    $bytes(self)
                }
            }
        )*
    };
}

impl_used_bits! {
    u8 => used_bits_u8, used_bytes_u8;
    u16 => used_bits_u16, used_bytes_u16;
    u32 => used_bits_u32, used_bytes_u32;
    u64 => used_bits_u64, used_bytes_u64;
}

impl UsedBits for usize {
    #[inline(always)]
    fn used_bit_count(self) -> usize {
        used_bits_u64(self as u64)
    }

    #[inline(always)]
    fn used_byte_count(self) -> usize {
        used_bytes_u64(self as u64)
    }
}
