use crate::{Error, PackedWidth, Word, bit_len, codec, packed};

/// Forward writer over a borrowed word slice. Writes are masked, so a writer
/// started over a partly filled buffer only touches the bits it writes.
#[derive(Debug)]
pub struct BitWriter<'dst, W: Word = u8> {
    dst: &'dst mut [W],
    position: usize,
}

impl<'dst, W: Word> BitWriter<'dst, W> {
    pub const fn new(dst: &'dst mut [W]) -> Self {
        Self { dst, position: 0 }
    }

    pub const fn at(dst: &'dst mut [W], position: usize) -> Self {
        Self { dst, position }
    }

    #[inline(always)]
    pub fn write(&mut self, value: u64, n_bits: usize) -> Result<(), Error> {
        codec::write(self.dst, value, &mut self.position, n_bits)
    }

    #[inline(always)]
    pub fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        codec::write_bool(self.dst, value, &mut self.position)
    }

    #[inline(always)]
    pub fn write_signed(&mut self, value: i32, n_bits: usize) -> Result<(), Error> {
        codec::write_signed(self.dst, value, &mut self.position, n_bits)
    }

    #[inline(always)]
    pub fn write_signed_i64(&mut self, value: i64, n_bits: usize) -> Result<(), Error> {
        codec::write_signed_i64(self.dst, value, &mut self.position, n_bits)
    }

    #[inline(always)]
    pub fn write_f32(&mut self, value: f32) -> Result<(), Error> {
        codec::write_f32(self.dst, value, &mut self.position)
    }

    #[inline(always)]
    pub fn write_f64(&mut self, value: f64) -> Result<(), Error> {
        codec::write_f64(self.dst, value, &mut self.position)
    }

    #[inline]
    pub fn write_packed(&mut self, value: u64, n_bits: usize) -> Result<(), Error> {
        packed::write_packed_bits(self.dst, value, &mut self.position, n_bits)
    }

    #[inline]
    pub fn write_signed_packed(&mut self, value: i32, n_bits: usize) -> Result<(), Error> {
        packed::write_signed_packed_bits(self.dst, value, &mut self.position, n_bits)
    }

    #[inline]
    pub fn write_packed_tier(&mut self, value: u64, width: PackedWidth) -> Result<(), Error> {
        packed::write_packed_tier(self.dst, value, &mut self.position, width)
    }

    #[inline]
    pub fn write_packed_bytes(&mut self, value: u64, n_bits: usize) -> Result<(), Error> {
        packed::write_packed_bytes(self.dst, value, &mut self.position, n_bits)
    }

    /// Overwrites an earlier field without moving the cursor.
    #[inline]
    pub fn patch(&mut self, position: usize, value: u64, n_bits: usize) -> Result<(), Error> {
        codec::write(self.dst, value, &mut { position }, n_bits)
    }

    #[inline(always)]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[inline(always)]
    pub fn bits_remaining(&self) -> usize {
        bit_len(self.dst).saturating_sub(self.position)
    }

    /// Bytes holding at least one written bit.
    #[inline(always)]
    pub const fn bytes_used(&self) -> usize {
        self.position.div_ceil(8)
    }

    pub fn into_inner(self) -> &'dst mut [W] {
        self.dst
    }
}
