//! Buffer initializers.

use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffer::Buffer;
use crate::element::Element;

/// Overwrites every cell of `buf` with `value`.
///
/// Performs no allocation. Cells are independent, so the sweep order is
/// irrelevant.
pub fn init_buffer<T: Element>(buf: &mut Buffer<T>, value: T) {
    buf.view_mut().fill(value);
}

/// Fills `buf` with values drawn from a `StdRng` seeded with `seed`.
///
/// The same seed always produces the same contents.
pub fn init_random<T>(buf: &mut Buffer<T>, seed: u64)
where
    T: Element,
    StandardUniform: Distribution<T>,
{
    let mut rng = StdRng::seed_from_u64(seed);
    buf.view_mut().iter_mut().for_each(|cell| *cell = rng.random());
}
