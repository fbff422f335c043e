//! Pure bit arithmetic shared by every bitcrush crate.
//!
//! Nothing in here touches a buffer: these are total functions over integers
//! (bit counting, zigzag folding, masks) plus the [`const_assert!`] helper.

/// Compile-time assertion. Fails the build when `$cond` is false.
#[macro_export]
macro_rules! const_assert {
    ($cond:expr $(,)?) => {
        const _: () = assert!($cond);
    };
}

mod bit_counter;
mod mask;
mod zigzag;

pub use bit_counter::*;
pub use mask::*;
pub use zigzag::*;
