//! Reads and writes specialized to `u64` words.
//!
//! A field touches at most two words here, so every operation is a fixed
//! handful of shifts with no loop. [`append`] goes one step further and skips
//! preserving anything at or above the field, which suits purely sequential
//! encoders that never revisit earlier positions.

use bitcrush_foundation::{check_bit_count, mask, unzigzag32, zigzag32};

use crate::{Error, word::check_capacity};

/// Masked write that advances `*position`. Equivalent to
/// [`codec::write`](crate::codec::write) over `u64` words.
#[inline(always)]
pub fn write(
    buf: &mut [u64],
    value: u64,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    inject(buf, value, *position, n_bits)?;
    *position += n_bits;
    Ok(())
}

/// Masked write at `position` that leaves the caller's cursor alone.
#[inline(always)]
pub fn inject(buf: &mut [u64], value: u64, position: usize, n_bits: usize) -> Result<(), Error> {
    check_bit_count(n_bits);
    if n_bits == 0 {
        return Ok(());
    }
    check_capacity(buf, position, n_bits)?;

    let mask = mask(n_bits);
    let value = value & mask;
    let index = position >> 6;
    let offset = position & 63;

    buf[index] = (buf[index] & !(mask << offset)) | (value << offset);
    if offset + n_bits > 64 {
        let shift = 64 - offset;
        let next = &mut buf[index + 1];
        *next = (*next & !(mask >> shift)) | (value >> shift);
    }

    Ok(())
}

/// Sequential write: keeps only the bits below `*position` in the current
/// word and overwrites the whole next word, when there is one.
///
/// Everything from `*position + n_bits` up to the end of the next word reads as
/// zero afterwards, whatever it held before.
#[inline(always)]
pub fn append(
    buf: &mut [u64],
    value: u64,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    check_bit_count(n_bits);
    if n_bits == 0 {
        return Ok(());
    }
    check_capacity(buf, *position, n_bits)?;

    let value = value & mask(n_bits);
    let index = *position >> 6;
    let offset = *position & 63;

    buf[index] = (buf[index] & mask(offset)) | (value << offset);
    if let Some(next) = buf.get_mut(index + 1) {
        *next = value.checked_shr((64 - offset) as u32).unwrap_or(0);
    }

    *position += n_bits;
    Ok(())
}

#[inline(always)]
pub fn read(buf: &[u64], position: &mut usize, n_bits: usize) -> Result<u64, Error> {
    check_bit_count(n_bits);
    if n_bits == 0 {
        return Ok(0);
    }
    check_capacity(buf, *position, n_bits)?;

    let index = *position >> 6;
    let offset = *position & 63;

    let low = buf[index] >> offset;
    let high = buf
        .get(index + 1)
        .map_or(0, |&next| next.checked_shl((64 - offset) as u32).unwrap_or(0));

    *position += n_bits;
    Ok((low | high) & mask(n_bits))
}

#[inline]
pub fn write_signed(
    buf: &mut [u64],
    value: i32,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    write(buf, zigzag32(value) as u64, position, n_bits)
}

#[inline]
pub fn append_signed(
    buf: &mut [u64],
    value: i32,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    append(buf, zigzag32(value) as u64, position, n_bits)
}

#[inline]
pub fn inject_signed(
    buf: &mut [u64],
    value: i32,
    position: usize,
    n_bits: usize,
) -> Result<(), Error> {
    inject(buf, zigzag32(value) as u64, position, n_bits)
}

#[inline]
pub fn read_signed(buf: &[u64], position: &mut usize, n_bits: usize) -> Result<i32, Error> {
    read(buf, position, n_bits).map(|folded| unzigzag32(folded as u32))
}
