//! Owned, bounds-checked 2D buffers.
//!
//! [`Buffer`] wraps an [`ndarray::Array2`] in standard (row-major) layout and
//! is the only container the harness hands to routines. Element `(i, j)` is
//! row `i`, column `j`. Any out-of-range access panics instead of touching
//! foreign memory, which the harness turns into a contract violation.

use std::ops::{Index, IndexMut};

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2, Axis};

use crate::element::Element;
use crate::error::{allocation_error, shape_mismatch, Result};

/// A fixed-size, exclusively owned `rows x cols` grid of `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer<T> {
    data: Array2<T>,
}

impl<T: Element> Buffer<T> {
    /// Allocates a `rows x cols` buffer with every cell set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HarnessError::Allocation`] if `rows * cols` overflows
    /// or the allocator cannot reserve the storage.
    pub fn filled(rows: usize, cols: usize, value: T) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .ok_or_else(|| allocation_error(rows, cols, "element count overflows usize"))?;

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(len)
            .map_err(|e| allocation_error(rows, cols, e.to_string()))?;
        storage.resize(len, value);

        let data = Array2::from_shape_vec((rows, cols), storage)
            .map_err(|e| allocation_error(rows, cols, e.to_string()))?;
        Ok(Buffer { data })
    }

    /// Allocates a zero-filled `rows x cols` buffer.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, T::zero())
    }

    /// Builds a buffer from row-major `values`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HarnessError::ShapeMismatch`] if `values.len()` is not
    /// `rows * cols`.
    pub fn from_rows(rows: usize, cols: usize, values: Vec<T>) -> Result<Self> {
        let len = values.len();
        let data = Array2::from_shape_vec((rows, cols), values)
            .map_err(|_| shape_mismatch("buffer data", (rows, cols), (len, 1)))?;
        Ok(Buffer { data })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Returns the cell at `(row, col)`, or `None` when out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        self.data.get((row, col)).copied()
    }

    /// Row `i` as a 1D view.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, T> {
        self.data.index_axis(Axis(0), i)
    }

    /// Column `j` as a 1D view.
    ///
    /// # Panics
    ///
    /// Panics if `j >= cols`.
    pub fn column(&self, j: usize) -> ArrayView1<'_, T> {
        self.data.index_axis(Axis(1), j)
    }

    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.data.view_mut()
    }

    /// Iterates cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<(usize, usize)> for Buffer<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<(usize, usize)> for Buffer<T> {
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.data[index]
    }
}
