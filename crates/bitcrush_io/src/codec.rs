//! Masked reads and writes over any [`Word`] array.
//!
//! A write replaces exactly the `n_bits` bits starting at the position and
//! leaves every other bit of the buffer untouched, so fields can be patched in
//! place and written in any order.

use bitcrush_foundation::{check_bit_count, mask, unzigzag32, unzigzag64, zigzag32, zigzag64};

use crate::{Error, Word, bit_len, word::check_capacity};

/// Writes the low `n_bits` bits of `value` at `*position` and advances it.
///
/// Panics when `n_bits > 64`. Errors leave `buf` and `*position` untouched.
#[inline]
pub fn write<W: Word>(
    buf: &mut [W],
    value: u64,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    check_bit_count(n_bits);
    if n_bits == 0 {
        return Ok(());
    }
    check_capacity(buf, *position, n_bits)?;

    let mask = mask(n_bits);
    let value = value & mask;
    let index = *position / W::BITS;
    let offset = *position % W::BITS;
    let last = (*position + n_bits - 1) / W::BITS;

    let first = buf[index].to_u64();
    buf[index] = W::from_u64((first & !(mask << offset)) | (value << offset));

    // The k-th following word holds the value bits from `k * BITS - offset`
    // upward, which is always below `n_bits` and therefore below 64.
    for (k, word) in buf[index + 1..=last].iter_mut().enumerate() {
        let shift = (k + 1) * W::BITS - offset;
        let current = word.to_u64();
        *word = W::from_u64((current & !(mask >> shift)) | (value >> shift));
    }

    *position += n_bits;
    Ok(())
}

/// Sequential write that clears forward the way [`fast::append`] does: every
/// bit from the end of the field up to the end of the following 64-bit word,
/// clamped to the buffer, reads as zero afterwards.
///
/// Bit positions map onto a `u64` view of `buf` one to one, so this and
/// [`fast::append`] leave identical buffers.
///
/// [`fast::append`]: crate::fast::append
#[inline]
pub fn append<W: Word>(
    buf: &mut [W],
    value: u64,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    check_bit_count(n_bits);
    if n_bits == 0 {
        return Ok(());
    }
    check_capacity(buf, *position, n_bits)?;

    let clear_end = ((*position >> 6) + 2)
        .saturating_mul(64)
        .min(bit_len(buf));
    write(buf, value, position, n_bits)?;

    let mut cursor = *position;
    while cursor < clear_end {
        let chunk = (clear_end - cursor).min(64);
        write(buf, 0, &mut cursor, chunk)?;
    }

    Ok(())
}

/// Reads `n_bits` bits at `*position` and advances it.
///
/// Panics when `n_bits > 64`. Errors leave `*position` untouched.
#[inline]
pub fn read<W: Word>(buf: &[W], position: &mut usize, n_bits: usize) -> Result<u64, Error> {
    check_bit_count(n_bits);
    if n_bits == 0 {
        return Ok(0);
    }
    check_capacity(buf, *position, n_bits)?;

    let index = *position / W::BITS;
    let offset = *position % W::BITS;
    let last = (*position + n_bits - 1) / W::BITS;

    let mut value = buf[index].to_u64() >> offset;
    for (k, word) in buf[index + 1..=last].iter().enumerate() {
        value |= word.to_u64() << ((k + 1) * W::BITS - offset);
    }

    *position += n_bits;
    Ok(value & mask(n_bits))
}

#[inline]
pub fn write_bool<W: Word>(buf: &mut [W], value: bool, position: &mut usize) -> Result<(), Error> {
    write(buf, value as u64, position, 1)
}

#[inline]
pub fn read_bool<W: Word>(buf: &[W], position: &mut usize) -> Result<bool, Error> {
    read(buf, position, 1).map(|bit| bit != 0)
}

/// Zigzag-folds `value` as a 32-bit integer and writes the low `n_bits` bits.
/// Any `n_bits` of 33 or more stores the full folded value.
#[inline]
pub fn write_signed<W: Word>(
    buf: &mut [W],
    value: i32,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    write(buf, zigzag32(value) as u64, position, n_bits)
}

#[inline]
pub fn read_signed<W: Word>(buf: &[W], position: &mut usize, n_bits: usize) -> Result<i32, Error> {
    read(buf, position, n_bits).map(|folded| unzigzag32(folded as u32))
}

#[inline]
pub fn write_signed_i64<W: Word>(
    buf: &mut [W],
    value: i64,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    write(buf, zigzag64(value), position, n_bits)
}

#[inline]
pub fn read_signed_i64<W: Word>(
    buf: &[W],
    position: &mut usize,
    n_bits: usize,
) -> Result<i64, Error> {
    read(buf, position, n_bits).map(unzigzag64)
}

/// Stores the IEEE-754 bit pattern in 32 bits.
#[inline]
pub fn write_f32<W: Word>(buf: &mut [W], value: f32, position: &mut usize) -> Result<(), Error> {
    write(buf, value.to_bits() as u64, position, 32)
}

#[inline]
pub fn read_f32<W: Word>(buf: &[W], position: &mut usize) -> Result<f32, Error> {
    read(buf, position, 32).map(|bits| f32::from_bits(bits as u32))
}

#[inline]
pub fn write_f64<W: Word>(buf: &mut [W], value: f64, position: &mut usize) -> Result<(), Error> {
    write(buf, value.to_bits(), position, 64)
}

#[inline]
pub fn read_f64<W: Word>(buf: &[W], position: &mut usize) -> Result<f64, Error> {
    read(buf, position, 64).map(f64::from_bits)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::tests::{encode_bits, pack_bits};

    #[test]
    fn test_write_straddles_bytes_lsb_first() -> Result<(), Error> {
        let mut buf = [0u8; 3];
        let mut pos = 4;
        write(&mut buf, 0xABC, &mut pos, 12)?;

        assert_eq!(pos, 16);
        assert_eq!(buf, [0xC0, 0xAB, 0x00]);

        Ok(())
    }

    #[test]
    fn test_write_preserves_neighbours() -> Result<(), Error> {
        let mut buf = [0xFFu8; 4];
        let mut pos = 5;
        write(&mut buf, 0, &mut pos, 17)?;

        assert_eq!(buf, [0x1F, 0x00, 0xC0, 0xFF]);

        let mut words = [u64::MAX; 2];
        let mut pos = 60;
        write(&mut words, 0, &mut pos, 8)?;
        assert_eq!(words, [u64::MAX >> 4, u64::MAX << 4]);

        Ok(())
    }

    #[test]
    fn test_sixty_four_bits_at_unaligned_byte_position() -> Result<(), Error> {
        let mut buf = [0u8; 10];
        let mut pos = 3;
        write(&mut buf, u64::MAX, &mut pos, 64)?;

        assert_eq!(pos, 67);
        assert_eq!(buf[0], 0xF8);
        assert_eq!(&buf[1..8], &[0xFF; 7]);
        assert_eq!(buf[8], 0x07);
        assert_eq!(buf[9], 0x00);

        let mut pos = 3;
        assert_eq!(read(&buf, &mut pos, 64)?, u64::MAX);

        Ok(())
    }

    #[test]
    fn test_sixty_four_bits_across_u32_words() -> Result<(), Error> {
        let mut buf = [0u32; 3];
        let mut pos = 31;
        write(&mut buf, 0x0123_4567_89AB_CDEF, &mut pos, 64)?;

        let mut pos = 31;
        assert_eq!(read(&buf, &mut pos, 64)?, 0x0123_4567_89AB_CDEF);
        assert_eq!(buf[0] & 0x7FFF_FFFF, 0);
        assert_eq!(buf[2] >> 31, 0);

        Ok(())
    }

    #[test]
    fn test_value_wider_than_field_is_truncated() -> Result<(), Error> {
        let mut buf = [0u16; 1];
        let mut pos = 2;
        write(&mut buf, 0xFFFF, &mut pos, 4)?;
        assert_eq!(buf[0], 0b11_1100);

        Ok(())
    }

    #[test]
    fn test_zero_bits_is_noop() -> Result<(), Error> {
        let mut buf = [0xAAu8; 1];
        let mut pos = 8;
        write(&mut buf, 1, &mut pos, 0)?;
        assert_eq!(read(&buf, &mut pos, 0)?, 0);
        assert_eq!(pos, 8);
        assert_eq!(buf, [0xAA]);

        Ok(())
    }

    #[test]
    fn test_capacity_errors_leave_state() -> Result<(), Error> {
        let mut buf = [0x55u8; 2];
        let mut pos = 10;
        let err = write(&mut buf, 0x7F, &mut pos, 7).unwrap_err();

        assert!(matches!(err, Error::CapacityExceeded { end: 17, capacity: 16 }));
        assert_eq!(pos, 10);
        assert_eq!(buf, [0x55; 2]);

        assert!(read(&buf, &mut pos, 7).is_err());
        assert_eq!(pos, 10);
        assert_eq!(read(&buf, &mut pos, 6)?, 0x15);

        Ok(())
    }

    #[test]
    #[should_panic(expected = "bit count 65 exceeds 64")]
    fn test_oversized_write_panics() {
        let mut buf = [0u64; 4];
        let _ = write(&mut buf, 0, &mut 0, 65);
    }

    #[test]
    fn test_signed_in_thirty_two_bits() -> Result<(), Error> {
        let mut buf = [0u8; 4];
        let mut pos = 0;
        write_signed(&mut buf, -129, &mut pos, 32)?;
        assert_eq!(buf, [0x01, 0x01, 0x00, 0x00]);

        let mut pos = 0;
        assert_eq!(read_signed(&buf, &mut pos, 32)?, -129);

        Ok(())
    }

    #[test]
    fn test_signed_extremes() -> Result<(), Error> {
        let mut buf = [0u64; 2];
        let mut pos = 7;
        write_signed(&mut buf, i32::MIN, &mut pos, 32)?;
        write_signed_i64(&mut buf, i64::MIN, &mut pos, 64)?;
        write_signed_i64(&mut buf, -3, &mut pos, 3)?;

        let mut pos = 7;
        assert_eq!(read_signed(&buf, &mut pos, 32)?, i32::MIN);
        assert_eq!(read_signed_i64(&buf, &mut pos, 64)?, i64::MIN);
        assert_eq!(read_signed_i64(&buf, &mut pos, 3)?, -3);

        Ok(())
    }

    #[test]
    fn test_floats_keep_bit_patterns() -> Result<(), Error> {
        let mut buf = [0u32; 5];
        let mut pos = 1;
        write_f32(&mut buf, -0.0, &mut pos)?;
        write_f32(&mut buf, f32::NAN, &mut pos)?;
        write_f64(&mut buf, core::f64::consts::PI, &mut pos)?;

        let mut pos = 1;
        assert_eq!(read_f32(&buf, &mut pos)?.to_bits(), (-0.0f32).to_bits());
        assert_eq!(read_f32(&buf, &mut pos)?.to_bits(), f32::NAN.to_bits());
        assert_eq!(read_f64(&buf, &mut pos)?, core::f64::consts::PI);

        Ok(())
    }

    #[test]
    fn test_flag_then_full_bytes() -> Result<(), Error> {
        let mut buf = [0u8; 128];
        let mut pos = 0;
        write_bool(&mut buf, true, &mut pos)?;
        for _ in 0..127 {
            write(&mut buf, 255, &mut pos, 8)?;
        }

        assert_eq!(pos, 1017);
        assert!(buf[..127].iter().all(|&b| b == 0xFF));
        assert_eq!(buf[127], 0x01);

        Ok(())
    }

    #[test]
    fn test_append_clears_to_following_word() -> Result<(), Error> {
        let mut buf = [0xFFu8; 24];
        let mut pos = 60;
        append(&mut buf, 0b1010, &mut pos, 8)?;
        assert_eq!(pos, 68);

        assert_eq!(buf[7], 0xAF);
        assert_eq!(buf[8], 0x00);
        assert!(buf[9..16].iter().all(|&b| b == 0));
        assert!(buf[16..].iter().all(|&b| b == 0xFF));

        let mut short = [0xFFFFu16; 3];
        let mut pos = 4;
        append(&mut short, 1, &mut pos, 4)?;
        assert_eq!(short, [0x001F, 0, 0]);

        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2000))]

        #[test]
        fn test_fuzz_matches_bit_layout(
            bits in prop::collection::vec(any::<bool>(), 1..512),
            chunk in 1usize..=64,
        ) {
            let mut buf = vec![0u8; bits.len().div_ceil(8)];
            let mut pos = 0;
            for field in bits.chunks(chunk) {
                write(&mut buf, pack_bits(field), &mut pos, field.len())?;
            }
            prop_assert_eq!(&buf, &encode_bits(&bits));

            let mut pos = 0;
            for field in bits.chunks(chunk) {
                prop_assert_eq!(read(&buf, &mut pos, field.len())?, pack_bits(field));
            }
        }

        #[test]
        fn test_fuzz_patch_only_touches_field(
            fill in any::<u64>(),
            value in any::<u64>(),
            start in 0usize..128,
            n_bits in 0usize..=64,
        ) {
            let mut bytes = [0u8; 24];
            let mut halves = [0u32; 6];
            let mut words = [0u64; 3];
            bytes.iter_mut().enumerate().for_each(|(i, b)| *b = (fill >> (i % 8 * 8)) as u8);
            for i in 0..192 {
                let bit = (bytes[i / 8] >> (i % 8)) & 1;
                halves[i / 32] |= (bit as u32) << (i % 32);
                words[i / 64] |= (bit as u64) << (i % 64);
            }
            let before = bytes;

            write(&mut bytes, value, &mut start.clone(), n_bits)?;
            write(&mut halves, value, &mut start.clone(), n_bits)?;
            write(&mut words, value, &mut start.clone(), n_bits)?;

            for i in 0..192 {
                let got = (bytes[i / 8] >> (i % 8)) & 1;
                let expected = if (start..start + n_bits).contains(&i) {
                    ((value >> (i - start)) & 1) as u8
                } else {
                    (before[i / 8] >> (i % 8)) & 1
                };
                prop_assert_eq!(got, expected, "bit {}", i);
                prop_assert_eq!(((halves[i / 32] >> (i % 32)) & 1) as u8, got);
                prop_assert_eq!(((words[i / 64] >> (i % 64)) & 1) as u8, got);
            }
        }

        #[test]
        fn test_fuzz_signed_roundtrip(value in any::<i32>(), start in 0usize..64) {
            let mut buf = [0u16; 8];
            let mut pos = start;
            write_signed(&mut buf, value, &mut pos, 32)?;
            let mut pos = start;
            prop_assert_eq!(read_signed(&buf, &mut pos, 32)?, value);
        }
    }
}
