//! Bit-addressed reads and writes over word arrays.
//!
//! Every function takes the backing slice and a bit position explicitly and
//! keeps no state of its own. Fields are packed LSB first: bit 0 of a value
//! lands on the lowest free bit of the current word, and a value straddling a
//! word boundary puts its low bits in the lower word.
//!
//! ```
//! use bitcrush_io::codec;
//!
//! let mut buf = [0u8; 4];
//! let mut pos = 0;
//! codec::write_bool(&mut buf, true, &mut pos)?;
//! codec::write(&mut buf, 0x2AB, &mut pos, 10)?;
//!
//! let mut pos = 0;
//! assert!(codec::read_bool(&buf, &mut pos)?);
//! assert_eq!(codec::read(&buf, &mut pos, 10)?, 0x2AB);
//! # Ok::<(), bitcrush_io::Error>(())
//! ```

mod bit_reader;
mod bit_writer;
pub mod codec;
pub mod fast;
pub mod packed;
pub mod primitive;
pub mod transcode;
mod word;

pub use bit_reader::BitReader;
pub use bit_writer::BitWriter;
pub use packed::PackedWidth;
pub use transcode::{WriteMode, transcode_bits};
pub use word::*;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("Capacity exceeded. End bit position: {end:?}, Capacity: {capacity:?}")]
    #[diagnostic(
        code(bitcrush::io::capacity_exceeded),
        help("The access would run past the end of the backing buffer. Grow the buffer or check the bit position.")
    )]
    CapacityExceeded { end: usize, capacity: usize },

    #[error("Invalid packed header. Decoded length: {count:?}, Maximum: {max:?}")]
    #[diagnostic(
        code(bitcrush::io::invalid_packed_header),
        help("The packed field claims more significant bits than its declared width allows. The input is corrupt or was written with another packed convention.")
    )]
    InvalidPackedHeader { count: usize, max: usize },
}
