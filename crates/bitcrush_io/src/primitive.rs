//! A single integer used as a tiny bit buffer, e.g. to assemble a flags word
//! field by field before storing it.

use bitcrush_foundation::{unzigzag32, zigzag32};

use crate::{Error, Word, codec};

#[inline]
pub fn inject<W: Word>(
    target: &mut W,
    value: u64,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    codec::write(core::slice::from_mut(target), value, position, n_bits)
}

/// [`inject`] without advancing a cursor.
#[inline]
pub fn inject_at<W: Word>(
    target: &mut W,
    value: u64,
    position: usize,
    n_bits: usize,
) -> Result<(), Error> {
    inject(target, value, &mut { position }, n_bits)
}

#[inline]
pub fn extract<W: Word>(source: W, position: &mut usize, n_bits: usize) -> Result<u64, Error> {
    codec::read(core::slice::from_ref(&source), position, n_bits)
}

#[inline]
pub fn inject_signed<W: Word>(
    target: &mut W,
    value: i32,
    position: &mut usize,
    n_bits: usize,
) -> Result<(), Error> {
    inject(target, zigzag32(value) as u64, position, n_bits)
}

#[inline]
pub fn extract_signed<W: Word>(
    source: W,
    position: &mut usize,
    n_bits: usize,
) -> Result<i32, Error> {
    extract(source, position, n_bits).map(|folded| unzigzag32(folded as u32))
}

#[inline]
pub fn inject_bool<W: Word>(
    target: &mut W,
    value: bool,
    position: &mut usize,
) -> Result<(), Error> {
    inject(target, value as u64, position, 1)
}

#[inline]
pub fn extract_bool<W: Word>(source: W, position: &mut usize) -> Result<bool, Error> {
    extract(source, position, 1).map(|bit| bit != 0)
}

#[inline]
pub fn inject_f32<W: Word>(target: &mut W, value: f32, position: &mut usize) -> Result<(), Error> {
    inject(target, value.to_bits() as u64, position, 32)
}

#[inline]
pub fn extract_f32<W: Word>(source: W, position: &mut usize) -> Result<f32, Error> {
    extract(source, position, 32).map(|bits| f32::from_bits(bits as u32))
}
