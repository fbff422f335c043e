pub use bitcrush_foundation::*;
pub use bitcrush_io::{Word, WriteMode, bit_len, codec, fast, transcode_bits};

pub use crate::errors::*;
