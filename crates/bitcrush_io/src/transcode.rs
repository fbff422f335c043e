//! Bulk bit copies between word arrays of any shape.

use crate::{Error, Word, as_u64_words, as_u64_words_mut, codec, fast, word::check_capacity};

/// How [`transcode_bits`] writes into the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Only the copied range changes.
    #[default]
    Masked,
    /// Sequential writes that also clear destination bits past the copied
    /// range up to the end of the following 64-bit word. Every word shape and
    /// alignment ends up with the same bits.
    Append,
}

/// Copies `n_bits` bits from `src` starting at `src_position` into `dst` at
/// `*dst_position`, 64 bits per step, and advances `*dst_position` by
/// `n_bits`.
///
/// Both ranges are checked before anything is written, so an error leaves
/// `dst` and `*dst_position` untouched.
pub fn transcode_bits<S: Word, D: Word>(
    src: &[S],
    src_position: usize,
    dst: &mut [D],
    dst_position: &mut usize,
    n_bits: usize,
    mode: WriteMode,
) -> Result<(), Error> {
    check_capacity(src, src_position, n_bits)?;
    check_capacity(dst, *dst_position, n_bits)?;

    let fast_src = as_u64_words(src);
    let mut read_position = src_position;
    let mut read_chunk = |chunk: usize| match fast_src {
        Some(words) => fast::read(words, &mut read_position, chunk),
        None => codec::read(src, &mut read_position, chunk),
    };

    tracing::trace!(
        "transcode; bits={n_bits}; src_word={}; dst_word={}; fast_src={}; mode={mode:?}",
        S::BITS,
        D::BITS,
        fast_src.is_some(),
    );

    if let Some(words) = as_u64_words_mut(dst) {
        return copy_chunks(n_bits, &mut read_chunk, |value, chunk| match mode {
            WriteMode::Masked => fast::write(words, value, dst_position, chunk),
            WriteMode::Append => fast::append(words, value, dst_position, chunk),
        });
    }

    copy_chunks(n_bits, &mut read_chunk, |value, chunk| match mode {
        WriteMode::Masked => codec::write(dst, value, dst_position, chunk),
        WriteMode::Append => codec::append(dst, value, dst_position, chunk),
    })
}

#[inline]
fn copy_chunks(
    n_bits: usize,
    mut read: impl FnMut(usize) -> Result<u64, Error>,
    mut write: impl FnMut(u64, usize) -> Result<(), Error>,
) -> Result<(), Error> {
    let mut remaining = n_bits;
    while remaining > 0 {
        let chunk = remaining.min(64);
        let value = read(chunk)?;
        write(value, chunk)?;
        remaining -= chunk;
    }

    Ok(())
}
