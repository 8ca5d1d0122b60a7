//! Lazy per-column access over a flat 2D buffer.
//!
//! A [`Column`] borrows the buffer and walks one column in row order. Row-major buffers are
//! read with a stride of `column_count`, column-major buffers as a contiguous slice; neither
//! copies the array.

use std::iter::FusedIterator;

use crate::types::Element;

/// One column of an [`crate::types::ArrayView`].
///
/// `Column` is `Copy`: every call to [`Column::iter`] starts a fresh traversal, so several
/// aggregators can walk the same column.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a, T> {
    data: &'a [T],
    start: usize,
    stride: usize,
    len: usize,
}

impl<'a, T: Element> Column<'a, T> {
    pub(crate) fn contiguous(data: &'a [T]) -> Self {
        Self {
            data,
            start: 0,
            stride: 1,
            len: data.len(),
        }
    }

    pub(crate) fn strided(data: &'a [T], start: usize, stride: usize, len: usize) -> Self {
        debug_assert!(len == 0 || start + (len - 1) * stride < data.len());
        Self {
            data,
            start,
            stride,
            len,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate the column values as `f64`, in row order.
    pub fn iter(&self) -> ColumnIter<'a, T> {
        ColumnIter {
            data: self.data,
            next: self.start,
            stride: self.stride,
            remaining: self.len,
        }
    }

    /// Materialize the column (O(row_count) space).
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

impl<'a, T: Element> IntoIterator for Column<'a, T> {
    type Item = f64;
    type IntoIter = ColumnIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`Column`].
#[derive(Debug, Clone)]
pub struct ColumnIter<'a, T> {
    data: &'a [T],
    next: usize,
    stride: usize,
    remaining: usize,
}

impl<T: Element> Iterator for ColumnIter<'_, T> {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.data[self.next].to_f64();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next += self.stride;
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Element> ExactSizeIterator for ColumnIter<'_, T> {}

impl<T: Element> FusedIterator for ColumnIter<'_, T> {}
