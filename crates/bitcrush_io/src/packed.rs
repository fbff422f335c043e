//! Length-prefixed integers: a small header holding how many bits (or bytes)
//! the value really uses, followed by exactly that many payload bits.
//!
//! Three header conventions are available and they do not interoperate. A
//! field has to be read back with the family it was written with.
//!
//! | family         | header width                              | header stores      |
//! |----------------|-------------------------------------------|--------------------|
//! | `packed_bits`  | bits needed to write `n_bits`             | used bit count     |
//! | `packed_tier`  | 3/4/5/6 for u8/u16/u32/u64                | used bit count - 1 |
//! | `packed_bytes` | bits needed to write `n_bits.div_ceil(8)` | used byte count    |
//!
//! The `packed_bits` and `packed_bytes` reads validate the decoded count
//! against the declared width and fail with [`Error::InvalidPackedHeader`]
//! instead of reading garbage.
//! Both reads and writes leave the cursor where it was on error.

use bitcrush_foundation::{
    check_bit_count, mask, unzigzag32, used_bits_u64, used_bytes_u64, zigzag32,
};

use crate::{Error, Word, codec, word::check_capacity};

/// Width of the header that stores a used bit count for a field declared
/// `n_bits` wide.
#[inline(always)]
pub const fn header_bits(n_bits: usize) -> usize {
    used_bits_u64(n_bits as u64)
}

/// Total size of `value` encoded by [`write_packed_bits`].
#[inline]
pub fn packed_bits_len(value: u64, n_bits: usize) -> usize {
    header_bits(n_bits) + used_bits_u64(value & mask(n_bits))
}

/// Writes `value`, truncated to `n_bits`, as a used-bit-count header followed by
/// its significant bits. Zero costs only the header.
pub fn write_packed_bits<W: Word>(
    buf: &mut [W],
    value: u64,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    check_bit_count(n_bits);
    let value = value & mask(n_bits);
    let used = used_bits_u64(value);
    let header = header_bits(n_bits);
    check_capacity(buf, *position, header + used)?;

    tracing::debug!(
        "packed bits; value={value}; declared={n_bits}; header={header}; payload={used}"
    );
    codec::write(buf, used as u64, position, header)?;
    codec::write(buf, value, position, used)
}

pub fn read_packed_bits<W: Word>(
    buf: &[W],
    position: &mut usize,
    n_bits: usize,
) -> Result<u64, Error> {
    check_bit_count(n_bits);
    let mut cursor = *position;
    let used = codec::read(buf, &mut cursor, header_bits(n_bits))? as usize;
    if used > n_bits {
        return Err(Error::InvalidPackedHeader {
            count: used,
            max: n_bits,
        });
    }

    let value = codec::read(buf, &mut cursor, used)?;
    *position = cursor;
    Ok(value)
}

pub fn write_signed_packed_bits<W: Word>(
    buf: &mut [W],
    value: i32,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    write_packed_bits(buf, zigzag32(value) as u64, position, n_bits)
}

pub fn read_signed_packed_bits<W: Word>(
    buf: &[W],
    position: &mut usize,
    n_bits: usize,
) -> Result<i32, Error> {
    read_packed_bits(buf, position, n_bits).map(|folded| unzigzag32(folded as u32))
}

/// Named integer widths with a fixed header size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackedWidth {
    U8,
    U16,
    U32,
    U64,
}

impl PackedWidth {
    #[inline(always)]
    pub const fn header_bits(self) -> usize {
        match self {
            Self::U8 => 3,
            Self::U16 => 4,
            Self::U32 => 5,
            Self::U64 => 6,
        }
    }

    #[inline(always)]
    pub const fn max_bits(self) -> usize {
        match self {
            Self::U8 => 8,
            Self::U16 => 16,
            Self::U32 => 32,
            Self::U64 => 64,
        }
    }
}

/// Writes `value`, truncated to the width, with a header holding its used bit
/// count minus one. Zero is stored as a single 0 payload bit. Every header
/// value decodes to a count within the width, so tier reads never see an
/// invalid header.
pub fn write_packed_tier<W: Word>(
    buf: &mut [W],
    value: u64,
    position: &mut usize,
    width: PackedWidth,
) -> Result<(), Error> {
    let value = value & mask(width.max_bits());
    let used = used_bits_u64(value).max(1);
    let header = width.header_bits();
    check_capacity(buf, *position, header + used)?;

    tracing::debug!("packed tier; value={value}; width={width:?}; payload={used}");
    codec::write(buf, (used - 1) as u64, position, header)?;
    codec::write(buf, value, position, used)
}

pub fn read_packed_tier<W: Word>(
    buf: &[W],
    position: &mut usize,
    width: PackedWidth,
) -> Result<u64, Error> {
    let mut cursor = *position;
    let used = codec::read(buf, &mut cursor, width.header_bits())? as usize + 1;
    let value = codec::read(buf, &mut cursor, used)?;
    *position = cursor;
    Ok(value)
}

pub fn write_signed_packed_tier<W: Word>(
    buf: &mut [W],
    value: i32,
    position: &mut usize,
    width: PackedWidth,
) -> Result<(), Error> {
    write_packed_tier(buf, zigzag32(value) as u64, position, width)
}

pub fn read_signed_packed_tier<W: Word>(
    buf: &[W],
    position: &mut usize,
    width: PackedWidth,
) -> Result<i32, Error> {
    read_packed_tier(buf, position, width).map(|folded| unzigzag32(folded as u32))
}

/// Writes `value`, truncated to `n_bits`, as a used-byte-count header followed
/// by that many whole bytes of payload.
pub fn write_packed_bytes<W: Word>(
    buf: &mut [W],
    value: u64,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    check_bit_count(n_bits);
    let value = value & mask(n_bits);
    let used = used_bytes_u64(value);
    let header = header_bits(n_bits.div_ceil(8));
    check_capacity(buf, *position, header + used * 8)?;

    tracing::debug!("packed bytes; value={value}; declared={n_bits}; payload_bytes={used}");
    codec::write(buf, used as u64, position, header)?;
    codec::write(buf, value, position, used * 8)
}

pub fn read_packed_bytes<W: Word>(
    buf: &[W],
    position: &mut usize,
    n_bits: usize,
) -> Result<u64, Error> {
    check_bit_count(n_bits);
    let max = n_bits.div_ceil(8);
    let mut cursor = *position;
    let used = codec::read(buf, &mut cursor, header_bits(max))? as usize;
    if used > max {
        return Err(Error::InvalidPackedHeader { count: used, max });
    }

    let value = codec::read(buf, &mut cursor, used * 8)?;
    *position = cursor;
    Ok(value)
}

pub fn write_signed_packed_bytes<W: Word>(
    buf: &mut [W],
    value: i32,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    write_packed_bytes(buf, zigzag32(value) as u64, position, n_bits)
}

pub fn read_signed_packed_bytes<W: Word>(
    buf: &[W],
    position: &mut usize,
    n_bits: usize,
) -> Result<i32, Error> {
    read_packed_bytes(buf, position, n_bits).map(|folded| unzigzag32(folded as u32))
}
