use crate::Error;

/// Element type of a backing array. The codecs only need the element width
/// and a lossless trip through `u64`.
pub trait Word: bytemuck::Pod + Default + Eq + core::fmt::Debug {
    const BITS: usize;

    fn to_u64(self) -> u64;

    /// Keeps the low `BITS` bits of `value`.
    fn from_u64(value: u64) -> Self;
}

macro_rules! impl_word {
    ($($ty:ty),*) => {
        $(
            impl Word for $ty {
                const BITS: usize = <$ty>::BITS as usize;

                #[inline(always)]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline(always)]
                fn from_u64(value: u64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_word!(u8, u16, u32, u64);

/// Length of `buf` in bits.
#[inline(always)]
pub fn bit_len<W: Word>(buf: &[W]) -> usize {
    buf.len() * W::BITS
}

/// Views `buf` as 64-bit words when the cast is exact (alignment and length)
/// and the host is little-endian, so the view reads the same bits as `buf`.
#[inline]
pub fn as_u64_words<W: Word>(buf: &[W]) -> Option<&[u64]> {
    if cfg!(target_endian = "little") {
        bytemuck::try_cast_slice(buf).ok()
    } else {
        None
    }
}

#[inline]
pub fn as_u64_words_mut<W: Word>(buf: &mut [W]) -> Option<&mut [u64]> {
    if cfg!(target_endian = "little") {
        bytemuck::try_cast_slice_mut(buf).ok()
    } else {
        None
    }
}

#[inline(always)]
pub(crate) fn check_capacity<W: Word>(
    buf: &[W],
    position: usize,
    n_bits: usize,
) -> Result<(), Error> {
    let capacity = bit_len(buf);
    match position.checked_add(n_bits) {
        Some(end) if end <= capacity => Ok(()),
        end => Err(Error::CapacityExceeded {
            end: end.unwrap_or(usize::MAX),
            capacity,
        }),
    }
}
