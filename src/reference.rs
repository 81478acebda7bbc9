//! Naive reference matrix multiplication, used as the oracle.

use crate::buffer::Buffer;
use crate::element::Element;
use crate::error::{shape_mismatch, Result};

/// Accumulates `C += A * B` with a plain i-j-k triple loop.
///
/// This is deliberately unoptimised: it exists so the generated routine has an
/// independent result to be checked against.
///
/// `c` must be zeroed by the caller. The loop only ever adds into `c`, so any
/// prior contents end up in the result.
///
/// # Errors
///
/// Returns [`crate::HarnessError::ShapeMismatch`] if `a.cols() != b.rows()` or
/// `c` is not `a.rows() x b.cols()`. Nothing is written in that case.
pub fn reference_matmul<T: Element>(a: &Buffer<T>, b: &Buffer<T>, c: &mut Buffer<T>) -> Result<()> {
    let (m, k) = a.shape();
    let (kb, n) = b.shape();

    if k != kb {
        return Err(shape_mismatch("reference inner dimension", a.shape(), b.shape()));
    }
    if c.shape() != (m, n) {
        return Err(shape_mismatch("reference output", (m, n), c.shape()));
    }

    for i in 0..m {
        for j in 0..n {
            for p in 0..k {
                c[(i, j)] = c[(i, j)].mul_add_wrapping(a[(i, p)], b[(p, j)]);
            }
        }
    }

    Ok(())
}
