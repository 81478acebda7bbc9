//! Element-wise comparison of a generated result against the reference.

use std::fmt;

use crate::buffer::Buffer;
use crate::element::Element;
use crate::error::{shape_mismatch, Result};

/// The first disagreeing cell plus how many cells disagree in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch<T> {
    /// `(row, col)` of the first mismatch in row-major order.
    pub at: (usize, usize),
    /// Value produced by the generated routine.
    pub generated: T,
    /// Value produced by the reference computation.
    pub reference: T,
    /// Number of disagreeing cells.
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T> {
    Pass,
    Fail(Mismatch<T>),
}

/// Result of comparing two same-shaped buffers under a test name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison<T> {
    pub test_name: String,
    pub shape: (usize, usize),
    pub outcome: Outcome<T>,
}

impl<T> Comparison<T> {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Pass)
    }

    pub fn cells(&self) -> usize {
        self.shape.0 * self.shape.1
    }
}

impl<T: fmt::Display> fmt::Display for Comparison<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Pass => write!(f, "Test {} succeeded.", self.test_name),
            Outcome::Fail(m) => write!(
                f,
                "Test {} failed. At ({}, {}), expected: {}, got: {} ({} of {} cells differ)",
                self.test_name,
                m.at.0,
                m.at.1,
                m.reference,
                m.generated,
                m.count,
                self.cells()
            ),
        }
    }
}

/// Compares every cell of `generated` against `reference`.
///
/// A numeric disagreement is a reported outcome, not an error, so callers
/// can carry on with further tests.
///
/// # Errors
///
/// Returns [`crate::HarnessError::ShapeMismatch`] if the two buffers do not
/// share a shape. No cells are compared in that case.
pub fn compare_buffers<T: Element>(
    test_name: &str,
    generated: &Buffer<T>,
    reference: &Buffer<T>,
) -> Result<Comparison<T>> {
    if generated.shape() != reference.shape() {
        return Err(shape_mismatch(test_name, generated.shape(), reference.shape()));
    }

    let cols = generated.cols();
    let mut first = None;
    let mut count = 0;

    for (idx, (&g, &r)) in generated.iter().zip(reference.iter()).enumerate() {
        if g != r {
            count += 1;
            if first.is_none() {
                first = Some(((idx / cols, idx % cols), g, r));
            }
        }
    }

    let outcome = match first {
        None => Outcome::Pass,
        Some((at, generated, reference)) => Outcome::Fail(Mismatch {
            at,
            generated,
            reference,
            count,
        }),
    };

    Ok(Comparison {
        test_name: test_name.to_string(),
        shape: generated.shape(),
        outcome,
    })
}
