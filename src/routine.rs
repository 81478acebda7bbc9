//! The seam between the harness and the routine under test.

use ndarray::{ArrayView2, ArrayViewMut2};

use crate::element::Element;

/// A matrix multiplication routine that can be validated by the harness.
///
/// Implementors must establish every cell of `c` such that
/// `c[[i, j]] == sum_k a[[i, k]] * b[[k, j]]` in wrapping arithmetic. The
/// caller does **not** zero `c` beforehand.
///
/// Views are bounds-checked: an out-of-range access panics, and the harness
/// reports that panic as a contract violation rather than a numeric mismatch.
pub trait MatmulRoutine<T: Element>: Sync {
    /// Name used in logs and contract-violation reports.
    fn name(&self) -> &str;

    fn matmul(&self, a: ArrayView2<'_, T>, b: ArrayView2<'_, T>, c: ArrayViewMut2<'_, T>);
}

/// Any plain function or closure with the right signature is a routine.
impl<T, F> MatmulRoutine<T> for F
where
    T: Element,
    F: Fn(ArrayView2<'_, T>, ArrayView2<'_, T>, ArrayViewMut2<'_, T>) + Sync,
{
    fn name(&self) -> &str {
        "closure"
    }

    fn matmul(&self, a: ArrayView2<'_, T>, b: ArrayView2<'_, T>, c: ArrayViewMut2<'_, T>) {
        self(a, b, c)
    }
}

/// Attaches a name to another routine.
pub struct Named<R> {
    name: String,
    inner: R,
}

impl<R> Named<R> {
    pub fn new(name: impl Into<String>, inner: R) -> Self {
        Named {
            name: name.into(),
            inner,
        }
    }
}

impl<T: Element, R: MatmulRoutine<T>> MatmulRoutine<T> for Named<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn matmul(&self, a: ArrayView2<'_, T>, b: ArrayView2<'_, T>, c: ArrayViewMut2<'_, T>) {
        self.inner.matmul(a, b, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    fn copy_a(a: ArrayView2<'_, u8>, _b: ArrayView2<'_, u8>, mut c: ArrayViewMut2<'_, u8>) {
        c.assign(&a);
    }

    #[test]
    fn test_fn_item_is_routine() {
        let a = Buffer::from_rows(2, 2, vec![1u8, 2, 3, 4]).unwrap();
        let b: Buffer<u8> = Buffer::new(2, 2).unwrap();
        let mut c: Buffer<u8> = Buffer::new(2, 2).unwrap();

        MatmulRoutine::<u8>::matmul(&copy_a, a.view(), b.view(), c.view_mut());

        assert_eq!(c, a);
        assert_eq!(MatmulRoutine::<u8>::name(&copy_a), "closure");
    }

    #[test]
    fn test_named_overrides_name() {
        let routine = Named::new("copy", copy_a);
        assert_eq!(MatmulRoutine::<u8>::name(&routine), "copy");
    }
}
