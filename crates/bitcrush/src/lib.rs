//! Bit-level packing of integers, flags and floats into word arrays.
//!
//! - [`foundation`]: used bit counts, zigzag folding, masks.
//! - [`io`]: stateless codecs over `u8`/`u16`/`u32`/`u64` slices, packed
//!   integers, cross-width copies and the [`BitWriter`]/[`BitReader`] cursors.
//! - [`stream`]: the fixed-capacity [`BitStream`].
//!
//! ```
//! use bitcrush::{BitReader, BitWriter};
//!
//! let mut buf = [0u32; 2];
//! let mut writer = BitWriter::new(&mut buf);
//! writer.write_signed(-129, 32)?;
//! writer.write_packed(5, 16)?;
//!
//! let mut reader = BitReader::new(&buf);
//! assert_eq!(reader.read_signed(32)?, -129);
//! assert_eq!(reader.read_packed(16)?, 5);
//! # Ok::<(), bitcrush::io::Error>(())
//! ```

pub use bitcrush_foundation as foundation;
pub use bitcrush_foundation::{UsedBits, unzigzag32, unzigzag64, zigzag32, zigzag64};
pub use bitcrush_io as io;
pub use bitcrush_io::{
    BitReader, BitWriter, PackedWidth, Word, WriteMode, codec, fast, packed, primitive,
    transcode_bits,
};
pub use bitcrush_stream as stream;
pub use bitcrush_stream::{BitStream, BitStream40, BitStream1024};
