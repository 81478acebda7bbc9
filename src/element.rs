//! Arithmetic domain of buffer cells.

use std::fmt::{Debug, Display};

use num::traits::{Bounded, WrappingAdd, WrappingMul, Zero};

/// A fixed-width unsigned integer cell type.
///
/// Every product and sum is taken modulo `2^bits`, so the generated routine
/// and the reference agree regardless of accumulation order.
pub trait Element:
    Copy
    + PartialEq
    + Debug
    + Display
    + Zero
    + Bounded
    + WrappingAdd
    + WrappingMul
    + Send
    + Sync
    + 'static
{
    /// `acc + a * b` with wraparound.
    #[inline(always)]
    fn mul_add_wrapping(self, a: Self, b: Self) -> Self {
        self.wrapping_add(&a.wrapping_mul(&b))
    }
}

impl Element for u8 {}
impl Element for u16 {}
impl Element for u32 {}
impl Element for u64 {}
