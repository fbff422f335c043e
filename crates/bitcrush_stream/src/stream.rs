use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::prelude::*;

/// `WORDS` 64-bit words of inline storage, a write cursor and a read cursor.
///
/// Every bit at or past the write cursor is zero. Writes only ever happen at
/// the write cursor and [`reset`](Self::reset) clears every word the cursor
/// reached, which keeps that true and lets equality, hashing and byte export
/// look at the written words only.
#[derive(Debug, Clone)]
pub struct BitStream<const WORDS: usize> {
    words: [u64; WORDS],
    write_cursor: usize,
    read_cursor: usize,
}

impl<const WORDS: usize> BitStream<WORDS> {
    pub const CAPACITY_BITS: usize = WORDS * 64;

    pub const fn new() -> Self {
        Self {
            words: [0; WORDS],
            write_cursor: 0,
            read_cursor: 0,
        }
    }

    /// Copies `src` verbatim. The write cursor ends at `src`'s length in bits.
    pub fn from_words<W: Word>(src: &[W]) -> Result<Self, Error> {
        let mut stream = Self::new();
        stream.write_words(src, bit_len(src))?;
        Ok(stream)
    }

    /// Appends the first `n_bits` bits of `src`, or all of it.
    pub fn write_from_bytes(&mut self, src: &[u8], n_bits: Option<usize>) -> Result<(), Error> {
        self.write_words(src, n_bits.unwrap_or(bit_len(src)))
    }

    /// Appends everything `other` has written.
    pub fn write_stream<const OTHER: usize>(
        &mut self,
        other: &BitStream<OTHER>,
    ) -> Result<(), Error> {
        self.write_words(other.as_words(), other.write_cursor)
    }

    fn write_words<W: Word>(&mut self, src: &[W], n_bits: usize) -> Result<(), Error> {
        let available = bit_len(src);
        if n_bits > available {
            return Err(Error::SourceTooShort {
                requested: n_bits,
                available,
            });
        }
        self.reserve(n_bits)?;
        transcode_bits(
            src,
            0,
            &mut self.words,
            &mut self.write_cursor,
            n_bits,
            WriteMode::Masked,
        )?;
        Ok(())
    }

    #[inline(always)]
    fn reserve(&self, n_bits: usize) -> Result<(), Error> {
        match self.write_cursor.checked_add(n_bits) {
            Some(end) if end <= Self::CAPACITY_BITS => Ok(()),
            end => {
                let end = end.unwrap_or(usize::MAX);
                tracing::warn!(
                    "BitStream write rejected; end={end}; capacity={}",
                    Self::CAPACITY_BITS
                );
                Err(Error::CapacityExceeded {
                    end,
                    capacity: Self::CAPACITY_BITS,
                })
            }
        }
    }

    /// Writes the low `n_bits` bits of `value` at the write cursor.
    ///
    /// Panics when `n_bits > 64`. A write that does not fit leaves the stream
    /// untouched.
    #[inline]
    pub fn write(&mut self, value: u64, n_bits: usize) -> Result<(), Error> {
        check_bit_count(n_bits);
        self.reserve(n_bits)?;
        fast::write(&mut self.words, value, &mut self.write_cursor, n_bits)?;
        Ok(())
    }

    /// Reads `n_bits` bits at the read cursor. Reading past the write cursor
    /// fails and leaves the read cursor where it was.
    #[inline]
    pub fn read(&mut self, n_bits: usize) -> Result<u64, Error> {
        check_bit_count(n_bits);
        let remaining = self.remaining_bits();
        if n_bits > remaining {
            tracing::warn!("BitStream read rejected; requested={n_bits}; remaining={remaining}");
            return Err(Error::NotEnoughBits {
                requested: n_bits,
                remaining,
            });
        }

        Ok(fast::read(&self.words, &mut self.read_cursor, n_bits)?)
    }

    #[inline]
    pub fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        self.write(value as u64, 1)
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.write(value as u64, 8)
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.write(value as u64, 16)
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) -> Result<(), Error> {
        self.write(value as u64, 32)
    }

    #[inline]
    pub fn write_u64(&mut self, value: u64) -> Result<(), Error> {
        self.write(value, 64)
    }

    /// Zigzag-folds `value` as a 32-bit integer.
    #[inline]
    pub fn write_signed(&mut self, value: i32, n_bits: usize) -> Result<(), Error> {
        self.write(zigzag32(value) as u64, n_bits)
    }

    #[inline]
    pub fn write_signed_i64(&mut self, value: i64, n_bits: usize) -> Result<(), Error> {
        self.write(zigzag64(value), n_bits)
    }

    #[inline]
    pub fn write_f32(&mut self, value: f32) -> Result<(), Error> {
        self.write(value.to_bits() as u64, 32)
    }

    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.read(1).map(|bit| bit != 0)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.read(8).map(|value| value as u8)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.read(16).map(|value| value as u16)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.read(32).map(|value| value as u32)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        self.read(64)
    }

    #[inline]
    pub fn read_signed(&mut self, n_bits: usize) -> Result<i32, Error> {
        self.read(n_bits).map(|folded| unzigzag32(folded as u32))
    }

    #[inline]
    pub fn read_signed_i64(&mut self, n_bits: usize) -> Result<i64, Error> {
        self.read(n_bits).map(unzigzag64)
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.read(32).map(|bits| f32::from_bits(bits as u32))
    }

    /// Clears both cursors and zeroes the words the write cursor reached.
    pub fn reset(&mut self) {
        let used = self.used_words();
        self.words[..used].fill(0);
        self.write_cursor = 0;
        self.read_cursor = 0;
    }

    pub fn rewind_read(&mut self) {
        self.read_cursor = 0;
    }

    /// Copies every written bit into `target` at `*target_position`, one byte
    /// at a time, and advances `*target_position`. The stream's own cursors do
    /// not move.
    pub fn read_out<W: Word>(
        &self,
        target: &mut [W],
        target_position: &mut usize,
    ) -> Result<(), Error> {
        let capacity = bit_len(target);
        match target_position.checked_add(self.write_cursor) {
            Some(end) if end <= capacity => {}
            end => {
                return Err(bitcrush_io::Error::CapacityExceeded {
                    end: end.unwrap_or(usize::MAX),
                    capacity,
                }
                .into());
            }
        }

        let mut position = 0;
        while position < self.write_cursor {
            let chunk = (self.write_cursor - position).min(8);
            let byte = fast::read(&self.words, &mut position, chunk)?;
            codec::write(target, byte, target_position, chunk)?;
        }

        Ok(())
    }

    /// The first [`write_cursor_bytes`](Self::write_cursor_bytes) bytes of the
    /// stream.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.as_words()
            .iter()
            .flat_map(|word| word.to_le_bytes())
            .take(self.write_cursor_bytes())
            .collect()
    }

    /// The words holding at least one written bit.
    #[inline(always)]
    pub fn as_words(&self) -> &[u64] {
        &self.words[..self.used_words()]
    }

    #[inline(always)]
    fn used_words(&self) -> usize {
        self.write_cursor.div_ceil(64)
    }

    #[inline(always)]
    pub const fn capacity_bits(&self) -> usize {
        Self::CAPACITY_BITS
    }

    #[inline(always)]
    pub const fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    #[inline(always)]
    pub const fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    #[inline(always)]
    pub const fn write_cursor_bytes(&self) -> usize {
        self.write_cursor.div_ceil(8)
    }

    #[inline(always)]
    pub const fn read_cursor_bytes(&self) -> usize {
        self.read_cursor.div_ceil(8)
    }

    /// Bits written but not read yet.
    #[inline(always)]
    pub const fn remaining_bits(&self) -> usize {
        self.write_cursor - self.read_cursor
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.write_cursor == 0
    }

    #[inline]
    pub fn word(&self, index: usize) -> Option<u64> {
        self.words.get(index).copied()
    }

    /// Views the words as little-endian bytes.
    #[inline]
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.words
            .get(index / 8)
            .map(|word| (word >> (index % 8 * 8)) as u8)
    }

    #[inline]
    pub fn u16_at(&self, index: usize) -> Option<u16> {
        self.words
            .get(index / 4)
            .map(|word| (word >> (index % 4 * 16)) as u16)
    }

    #[inline]
    pub fn u32_at(&self, index: usize) -> Option<u32> {
        self.words
            .get(index / 2)
            .map(|word| (word >> (index % 2 * 32)) as u32)
    }

    /// How many of `total_bits` land in word `word_index`.
    #[inline(always)]
    pub const fn bits_used_by_word(word_index: usize, total_bits: usize) -> usize {
        let before = word_index.saturating_mul(64);
        if total_bits <= before {
            0
        } else if total_bits - before >= 64 {
            64
        } else {
            total_bits - before
        }
    }
}

impl<const WORDS: usize> Default for BitStream<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WORDS: usize> PartialEq for BitStream<WORDS> {
    fn eq(&self, other: &Self) -> bool {
        self.write_cursor == other.write_cursor && self.as_words() == other.as_words()
    }
}

impl<const WORDS: usize> Eq for BitStream<WORDS> {}

impl<const WORDS: usize> Hash for BitStream<WORDS> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.write_cursor.hash(state);
        self.as_words().hash(state);
    }
}

impl<const WORDS: usize> fmt::Display for BitStream<WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BitStream({} bits; write={}; read={}) [",
            Self::CAPACITY_BITS,
            self.write_cursor,
            self.read_cursor
        )?;
        for (i, word) in self.as_words().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{word:#018x}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use std::hash::{BuildHasher, RandomState};

    use proptest::prelude::*;

    use super::*;
    use crate::{BitStream40, BitStream1024};

    #[test]
    fn test_overflow_keeps_cursor() -> Result<(), Error> {
        let mut stream = BitStream40::new();
        for _ in 0..10 {
            stream.write(0x3FFF_FFFF, 30)?;
        }
        assert_eq!(stream.write_cursor(), 300);

        assert!(matches!(
            stream.write(1, 30),
            Err(Error::CapacityExceeded { end: 330, capacity: 320 })
        ));
        assert_eq!(stream.write_cursor(), 300);

        stream.write(0xFFFFF, 20)?;
        assert_eq!(stream.write_cursor(), 320);
        assert!(stream.write_bool(true).is_err());
        assert!(stream.write(0, 0).is_ok());

        Ok(())
    }

    #[test]
    fn test_exact_fill_with_full_words() -> Result<(), Error> {
        let mut stream = BitStream40::new();
        for i in 0..5 {
            stream.write_u64(u64::MAX - i)?;
        }
        assert!(matches!(
            stream.write_bool(false),
            Err(Error::CapacityExceeded { end: 321, capacity: 320 })
        ));

        for i in 0..5 {
            assert_eq!(stream.read_u64()?, u64::MAX - i);
        }

        Ok(())
    }

    #[test]
    fn test_read_cannot_overtake_write() -> Result<(), Error> {
        let mut stream = BitStream40::new();
        stream.write_u8(0xAB)?;
        assert!(matches!(
            stream.read(9),
            Err(Error::NotEnoughBits { requested: 9, remaining: 8 })
        ));
        assert_eq!(stream.read_cursor(), 0);

        assert_eq!(stream.read_u8()?, 0xAB);
        stream.write_u16(0xBEEF)?;
        assert_eq!(stream.remaining_bits(), 16);
        assert_eq!(stream.read_u16()?, 0xBEEF);

        Ok(())
    }

    #[test]
    fn test_typed_wrappers() -> Result<(), Error> {
        let mut stream = BitStream1024::new();
        stream.write_bool(true)?;
        stream.write_u8(0x12)?;
        stream.write_u16(0x3456)?;
        stream.write_u32(0x789A_BCDE)?;
        stream.write_u64(0x0FED_CBA9_8765_4321)?;
        stream.write_signed(-129, 32)?;
        stream.write_signed(5, 4)?;
        stream.write_signed_i64(-(1 << 40), 48)?;
        stream.write_f32(-0.5)?;

        assert!(stream.read_bool()?);
        assert_eq!(stream.read_u8()?, 0x12);
        assert_eq!(stream.read_u16()?, 0x3456);
        assert_eq!(stream.read_u32()?, 0x789A_BCDE);
        assert_eq!(stream.read_u64()?, 0x0FED_CBA9_8765_4321);
        assert_eq!(stream.read_signed(32)?, -129);
        assert_eq!(stream.read_signed(4)?, 5);
        assert_eq!(stream.read_signed_i64(48)?, -(1 << 40));
        assert_eq!(stream.read_f32()?, -0.5);
        assert_eq!(stream.remaining_bits(), 0);

        Ok(())
    }

    #[test]
    fn test_reset_reproduces() -> Result<(), Error> {
        let run = |stream: &mut BitStream40| -> Result<Vec<u64>, Error> {
            stream.write_bool(true)?;
            stream.write(0x1234_5678_9ABC, 48)?;
            stream.write_signed(-3, 7)?;
            let values = vec![stream.read(1)?, stream.read(48)?, stream.read(7)?];
            Ok(values)
        };

        let mut stream = BitStream40::new();
        let first = run(&mut stream)?;
        let snapshot = stream.clone();

        stream.reset();
        assert!(stream.is_empty());
        assert_eq!(stream.read_cursor(), 0);
        assert_eq!(stream.word(0), Some(0));

        let second = run(&mut stream)?;
        assert_eq!(first, second);
        assert_eq!(stream, snapshot);

        Ok(())
    }

    #[test]
    fn test_equality_ignores_read_cursor() -> Result<(), Error> {
        let mut a = BitStream40::new();
        let mut b = BitStream40::new();
        a.write(0b101, 3)?;
        b.write(0b101, 3)?;
        a.read(2)?;
        assert_eq!(a, b);

        let hasher = RandomState::new();
        assert_eq!(hasher.hash_one(&a), hasher.hash_one(&b));

        b.write(0, 1)?;
        assert_ne!(a, b);

        Ok(())
    }

    #[test]
    fn test_from_words_of_each_shape() -> Result<(), Error> {
        let bytes = BitStream40::from_words(&[0x01u8, 0x02, 0x03])?;
        let halves = BitStream40::from_words(&[0x0201u16, 0x0003])?;
        let words = BitStream40::from_words(&[0x0003_0201u32])?;

        assert_eq!(bytes.write_cursor(), 24);
        assert_eq!(halves.write_cursor(), 32);
        assert_eq!(words.write_cursor(), 32);
        assert_eq!(bytes.word(0), Some(0x03_0201));
        assert_eq!(halves, words);
        assert_eq!(bytes.read_cursor(), 0);

        assert!(matches!(
            BitStream40::from_words(&[0u64; 6]),
            Err(Error::CapacityExceeded { end: 384, capacity: 320 })
        ));

        Ok(())
    }

    #[test]
    fn test_write_from_bytes_and_stream() -> Result<(), Error> {
        let mut stream = BitStream40::new();
        stream.write(0b1, 1)?;
        stream.write_from_bytes(&[0xFF, 0x0F], Some(12))?;
        assert_eq!(stream.write_cursor(), 13);
        assert_eq!(stream.word(0), Some(0x1FFF));

        let mut other = BitStream1024::new();
        other.write(0b10, 2)?;
        other.write_stream(&stream)?;
        assert_eq!(other.write_cursor(), 15);
        assert_eq!(other.word(0), Some(0x1FFF << 2 | 0b10));

        assert!(matches!(
            stream.write_from_bytes(&[0xFF], Some(9)),
            Err(Error::SourceTooShort { requested: 9, available: 8 })
        ));
        assert_eq!(stream.write_cursor(), 13);

        let mut full = BitStream40::new();
        for _ in 0..4 {
            full.write_u64(0)?;
        }
        full.write(0, 60)?;
        assert!(matches!(
            full.write_from_bytes(&[0xFF], Some(8)),
            Err(Error::CapacityExceeded { end: 324, capacity: 320 })
        ));

        Ok(())
    }

    #[test]
    fn test_read_out() -> Result<(), Error> {
        let mut stream = BitStream40::new();
        stream.write(0x3FF, 10)?;
        stream.write_u8(0x5A)?;

        let mut target = [0u8; 4];
        let mut pos = 4;
        stream.read_out(&mut target, &mut pos)?;
        assert_eq!(pos, 22);
        assert_eq!(target, [0xF0, 0xBF, 0x16, 0x00]);
        assert_eq!(stream.read_cursor(), 0);

        let mut small = [0u8; 2];
        let mut pos = 0;
        assert!(stream.read_out(&mut small, &mut pos).is_err());
        assert_eq!(pos, 0);

        Ok(())
    }

    #[test]
    fn test_to_bytes_and_views() -> Result<(), Error> {
        let mut stream = BitStream40::new();
        stream.write_u64(0x0807_0605_0403_0201)?;
        stream.write(0x1FF, 9)?;

        assert_eq!(stream.write_cursor_bytes(), 10);
        assert_eq!(
            stream.to_bytes(),
            [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0xFF, 0x01]
        );
        assert_eq!(stream.byte(3), Some(0x04));
        assert_eq!(stream.byte(9), Some(0x01));
        assert_eq!(stream.byte(40), None);
        assert_eq!(stream.u16_at(1), Some(0x0403));
        assert_eq!(stream.u32_at(1), Some(0x0807_0605));
        assert_eq!(stream.u32_at(10), None);
        assert_eq!(stream.word(1), Some(0x1FF));
        assert_eq!(stream.word(5), None);

        stream.read(12)?;
        assert_eq!(stream.read_cursor_bytes(), 2);

        Ok(())
    }

    #[test]
    fn test_bits_used_by_word() {
        assert_eq!(BitStream40::bits_used_by_word(0, 0), 0);
        assert_eq!(BitStream40::bits_used_by_word(0, 300), 64);
        assert_eq!(BitStream40::bits_used_by_word(4, 300), 44);
        assert_eq!(BitStream40::bits_used_by_word(5, 300), 0);
        assert_eq!(BitStream40::bits_used_by_word(usize::MAX, 300), 0);
    }

    #[test]
    fn test_display() -> Result<(), Error> {
        let mut stream = BitStream40::new();
        assert_eq!(stream.to_string(), "BitStream(320 bits; write=0; read=0) []");

        stream.write_u64(0xFF)?;
        stream.write(1, 1)?;
        assert_eq!(
            stream.to_string(),
            "BitStream(320 bits; write=65; read=0) [0x00000000000000ff, 0x0000000000000001]"
        );

        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn test_fuzz_fields_roundtrip(
            fields in prop::collection::vec((any::<u64>(), 0usize..=64), 0..40),
        ) {
            let mut stream = BitStream1024::new();
            let mut accepted = Vec::new();
            for (value, n_bits) in fields {
                match stream.write(value, n_bits) {
                    Ok(()) => accepted.push((value & mask(n_bits), n_bits)),
                    Err(Error::CapacityExceeded { .. }) => break,
                    Err(err) => return Err(err.into()),
                }
            }

            let bytes = stream.to_bytes();
            for (value, n_bits) in &accepted {
                prop_assert_eq!(stream.read(*n_bits)?, *value);
            }
            prop_assert_eq!(stream.remaining_bits(), 0);

            let mut copy = BitStream1024::new();
            copy.write_from_bytes(&bytes, Some(stream.write_cursor()))?;
            prop_assert_eq!(&copy, &stream);
        }
    }
}
