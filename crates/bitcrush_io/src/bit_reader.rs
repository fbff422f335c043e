use crate::{Error, PackedWidth, Word, bit_len, codec, packed};

/// Forward reader over a borrowed word slice.
#[derive(Debug, Clone)]
pub struct BitReader<'src, W: Word = u8> {
    src: &'src [W],
    position: usize,
}

impl<'src, W: Word> BitReader<'src, W> {
    pub const fn new(src: &'src [W]) -> Self {
        Self { src, position: 0 }
    }

    pub const fn at(src: &'src [W], position: usize) -> Self {
        Self { src, position }
    }

    #[inline(always)]
    pub fn read(&mut self, n_bits: usize) -> Result<u64, Error> {
        codec::read(self.src, &mut self.position, n_bits)
    }

    /// Reads without consuming.
    #[inline(always)]
    pub fn peek(&self, n_bits: usize) -> Result<u64, Error> {
        codec::read(self.src, &mut self.position.clone(), n_bits)
    }

    #[inline(always)]
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        codec::read_bool(self.src, &mut self.position)
    }

    #[inline(always)]
    pub fn read_signed(&mut self, n_bits: usize) -> Result<i32, Error> {
        codec::read_signed(self.src, &mut self.position, n_bits)
    }

    #[inline(always)]
    pub fn read_signed_i64(&mut self, n_bits: usize) -> Result<i64, Error> {
        codec::read_signed_i64(self.src, &mut self.position, n_bits)
    }

    #[inline(always)]
    pub fn read_f32(&mut self) -> Result<f32, Error> {
        codec::read_f32(self.src, &mut self.position)
    }

    #[inline(always)]
    pub fn read_f64(&mut self) -> Result<f64, Error> {
        codec::read_f64(self.src, &mut self.position)
    }

    #[inline]
    pub fn read_packed(&mut self, n_bits: usize) -> Result<u64, Error> {
        packed::read_packed_bits(self.src, &mut self.position, n_bits)
    }

    #[inline]
    pub fn read_signed_packed(&mut self, n_bits: usize) -> Result<i32, Error> {
        packed::read_signed_packed_bits(self.src, &mut self.position, n_bits)
    }

    #[inline]
    pub fn read_packed_tier(&mut self, width: PackedWidth) -> Result<u64, Error> {
        packed::read_packed_tier(self.src, &mut self.position, width)
    }

    #[inline]
    pub fn read_packed_bytes(&mut self, n_bits: usize) -> Result<u64, Error> {
        packed::read_packed_bytes(self.src, &mut self.position, n_bits)
    }

    #[inline(always)]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[inline(always)]
    pub fn bits_remaining(&self) -> usize {
        bit_len(self.src).saturating_sub(self.position)
    }

    /// Whole or partial bytes the reader has moved past.
    #[inline(always)]
    pub const fn bytes_consumed(&self) -> usize {
        self.position.div_ceil(8)
    }
}
