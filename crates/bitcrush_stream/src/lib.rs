//! Fixed-capacity bit buffer with independent write and read cursors.
//!
//! ```
//! use bitcrush_stream::BitStream40;
//!
//! let mut stream = BitStream40::new();
//! stream.write_bool(true)?;
//! stream.write_signed(-129, 32)?;
//! stream.write(0x2AB, 10)?;
//!
//! assert!(stream.read_bool()?);
//! assert_eq!(stream.read_signed(32)?, -129);
//! assert_eq!(stream.read(10)?, 0x2AB);
//! # Ok::<(), bitcrush_stream::Error>(())
//! ```

use bitcrush_foundation::const_assert;

mod errors;
mod prelude;
mod stream;

pub use errors::Error;
pub use stream::BitStream;

/// 40-byte stream.
pub type BitStream40 = BitStream<5>;
/// 1024-byte stream.
pub type BitStream1024 = BitStream<128>;

const_assert!(BitStream40::CAPACITY_BITS == 320);
const_assert!(BitStream1024::CAPACITY_BITS == 8192);
