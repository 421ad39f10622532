//! Growable sparse matrix in row-compressed form
//!
//! A `SparseMatrix` owns one [`SparseVector`] per row. Rows are stored
//! inline in a `Vec`, so appending rows is amortized O(1) and removing the
//! last row is O(1). The column count is advisory metadata: rows address
//! entries by column index rather than dense slot, so extending columns
//! never touches row storage.
//!
//! All bounds checks are fatal. An out-of-range index here is a programming
//! error in the caller, not a recoverable condition.

use std::cmp;
use std::fmt;

use tracing::trace;

use crate::sparse_vector::SparseVector;

const MIN_NUM_ROWS: usize = 10;
const MIN_NUM_COLS: usize = 10;

/// Sparse matrix of f64 values with growable row and column counts.
///
/// Conceptually `num_rows x num_cols`; only nonzero entries are stored.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    rows: Vec<SparseVector>,
    num_cols: usize,
    // advisory capacity, carried through the same doubling rule as rows so
    // column-indexed side tables in callers can pre-allocate
    max_num_cols: usize,
}

impl SparseMatrix {
    /// Create a `num_rows x num_cols` matrix of zeros.
    ///
    /// Capacity is reserved for twice the requested size (at least a small
    /// minimum) so early growth does not reallocate.
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        let mut rows = Vec::with_capacity(cmp::max(MIN_NUM_ROWS, 2 * num_rows));
        rows.resize_with(num_rows, SparseVector::new);
        Self {
            rows,
            num_cols,
            max_num_cols: cmp::max(MIN_NUM_COLS, 2 * num_cols),
        }
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Deep copy of the rectangular window starting at
    /// `(first_row, first_col)` with shape `num_rows x num_cols`.
    ///
    /// # Panics
    /// Panics if the window reaches outside the matrix.
    pub fn submatrix(
        &self,
        num_rows: usize,
        num_cols: usize,
        first_row: usize,
        first_col: usize,
    ) -> SparseMatrix {
        assert!(
            first_row + num_rows <= self.num_rows() && first_col + num_cols <= self.num_cols,
            "SparseMatrix::submatrix: window {}x{} at ({}, {}) outside {}x{} matrix",
            num_rows,
            num_cols,
            first_row,
            first_col,
            self.num_rows(),
            self.num_cols
        );
        let rows = self.rows[first_row..first_row + num_rows]
            .iter()
            .map(|row| row.window(num_cols, first_col))
            .collect();
        SparseMatrix {
            rows,
            num_cols,
            max_num_cols: num_cols,
        }
    }

    /// Bounds-checked read; returns 0.0 where no entry is stored
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.num_rows() && col < self.num_cols,
            "SparseMatrix::get: index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.num_rows(),
            self.num_cols
        );
        self.rows[row].get(col)
    }

    /// Bounds-checked write. Writing an exact 0.0 removes the entry.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(
            row < self.num_rows() && col < self.num_cols,
            "SparseMatrix::set: index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.num_rows(),
            self.num_cols
        );
        self.rows[row].set(col, value);
    }

    /// Write, growing the matrix first so that `(row, col)` is in range
    pub fn set_growing(&mut self, row: usize, col: usize, value: f64) {
        self.ensure_num_rows(row + 1);
        self.ensure_num_cols(col + 1);
        self.rows[row].set(col, value);
    }

    /// Append an entry at the end of a row in O(1).
    ///
    /// # Panics
    /// Panics if the index is out of range or `col` is not strictly past the
    /// row's last stored column.
    pub fn append_in_row(&mut self, row: usize, col: usize, value: f64) {
        assert!(
            row < self.num_rows() && col < self.num_cols,
            "SparseMatrix::append_in_row: index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.num_rows(),
            self.num_cols
        );
        self.rows[row].append(col, value);
    }

    /// Append `num` empty rows.
    ///
    /// Row storage doubles on overflow, so a long sequence of single-row
    /// appends stays amortized O(1) per row.
    ///
    /// # Panics
    /// Panics if `num` is zero.
    pub fn append_new_rows(&mut self, num: usize) {
        assert!(num >= 1, "SparseMatrix::append_new_rows: cannot add less than one row");
        if self.rows.len() + num > self.rows.capacity() {
            let new_cap = cmp::max(2 * self.rows.capacity(), self.rows.len() + num);
            trace!(
                "growing row table: {} -> {} slots",
                self.rows.capacity(),
                new_cap
            );
            self.rows.reserve_exact(new_cap - self.rows.len());
        }
        self.rows.resize_with(self.rows.len() + num, SparseVector::new);
    }

    /// Append `num` columns. Metadata-only: no per-row work is done.
    ///
    /// # Panics
    /// Panics if `num` is zero.
    pub fn append_new_cols(&mut self, num: usize) {
        assert!(num >= 1, "SparseMatrix::append_new_cols: cannot add less than one column");
        if self.num_cols + num > self.max_num_cols {
            self.max_num_cols = cmp::max(2 * self.max_num_cols, self.num_cols + num);
        }
        self.num_cols += num;
    }

    /// Grow to at least `num_rows` rows
    pub fn ensure_num_rows(&mut self, num_rows: usize) {
        assert!(num_rows > 0, "SparseMatrix::ensure_num_rows: num_rows must be positive");
        if self.num_rows() < num_rows {
            self.append_new_rows(num_rows - self.num_rows());
        }
    }

    /// Grow to at least `num_cols` columns
    pub fn ensure_num_cols(&mut self, num_cols: usize) {
        assert!(num_cols > 0, "SparseMatrix::ensure_num_cols: num_cols must be positive");
        if self.num_cols < num_cols {
            self.append_new_cols(num_cols - self.num_cols);
        }
    }

    /// Delete the last row in O(1).
    ///
    /// # Panics
    /// Panics if the matrix has no rows.
    pub fn remove_row(&mut self) {
        assert!(
            self.num_rows() > 0,
            "SparseMatrix::remove_row called on empty matrix"
        );
        self.rows.pop();
    }

    /// Read-only borrow of one row.
    ///
    /// The borrow must not be held across any mutating operation.
    pub fn get_row(&self, row: usize) -> &SparseVector {
        assert!(
            row < self.num_rows(),
            "SparseMatrix::get_row: row {} out of range for {} rows",
            row,
            self.num_rows()
        );
        &self.rows[row]
    }

    /// Overwrite one row
    pub fn set_row(&mut self, row: usize, new_row: SparseVector) {
        assert!(
            row < self.num_rows(),
            "SparseMatrix::set_row: row {} out of range for {} rows",
            row,
            self.num_rows()
        );
        self.rows[row] = new_row;
    }

    /// Replace the entire row storage, consuming the caller's rows.
    ///
    /// # Panics
    /// Panics if any row stores a column index at or past `num_cols`.
    pub fn import_rows(&mut self, num_cols: usize, rows: Vec<SparseVector>) {
        for (i, row) in rows.iter().enumerate() {
            if let Some(last) = row.last() {
                assert!(
                    last < num_cols,
                    "SparseMatrix::import_rows: row {} stores column {} past {} columns",
                    i,
                    last,
                    num_cols
                );
            }
        }
        self.rows = rows;
        self.num_cols = num_cols;
        self.max_num_cols = num_cols;
    }

    /// Total number of stored entries
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|row| row.nnz()).sum()
    }
}

impl Default for SparseMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

// capacity is not part of value identity
impl PartialEq for SparseMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.num_cols == other.num_cols && self.rows == other.rows
    }
}

impl fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} nnz:{}", self.num_rows(), self.num_cols, self.nnz())
    }
}
