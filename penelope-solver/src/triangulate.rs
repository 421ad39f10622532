//! Incremental triangulation driver
//!
//! After new measurement rows or state columns are appended, the factor is
//! no longer upper-triangular. The driver walks the rows in ascending order
//! and rotates every sub-diagonal leading entry away against the row whose
//! index equals the offending column. Because rows are processed in order,
//! the matrix stays in canonical R-form for all indices below the row being
//! worked on, and one sweep suffices.

use tracing::debug;

use crate::givens::{givens, rotate_rows};
use crate::sparse_matrix::SparseMatrix;

impl SparseMatrix {
    /// Zero the entry at `(row, col)` by rotating the target row against
    /// pivot row `col`. Returns the `(c, s)` rotation applied, so callers
    /// can replay it on a right-hand side.
    ///
    /// # Panics
    /// Panics if the index is outside the matrix or not below the diagonal
    /// (`row > col` is required).
    pub fn apply_givens(&mut self, row: usize, col: usize) -> (f64, f64) {
        assert!(
            row < self.num_rows() && col < self.num_cols(),
            "SparseMatrix::apply_givens: index ({}, {}) outside {}x{} matrix",
            row,
            col,
            self.num_rows(),
            self.num_cols()
        );
        assert!(
            row > col,
            "SparseMatrix::apply_givens: can only zero entries below the diagonal, got ({}, {})",
            row,
            col
        );

        let a = self.get_row(col).get(col);
        let b = self.get_row(row).get(col);
        let (c, s) = givens(a, b);

        let (new_top, mut new_bot) = rotate_rows(self.get_row(col), self.get_row(row), c, s);
        // the rotated target entry is analytically zero; scrub any residual
        // value that survived the prune threshold
        new_bot.remove(col);
        self.set_row(col, new_top);
        self.set_row(row, new_bot);
        (c, s)
    }

    /// Restore upper-triangular structure, returning the number of Givens
    /// rotations applied.
    ///
    /// Afterwards every row is either empty or has its leading stored column
    /// at or past the diagonal. A rotation can move a row's leading column
    /// right, leave it (the next nonzero may still be sub-diagonal), or
    /// empty the row entirely, so the leading column is re-queried after
    /// each rotation. On an already-triangular matrix this returns 0.
    pub fn triangulate(&mut self) -> usize {
        let mut count = 0;
        for row in 0..self.num_rows() {
            while let Some(col) = self.get_row(row).first() {
                if col >= row {
                    break;
                }
                self.apply_givens(row, col);
                count += 1;
            }
        }
        debug!("triangulate: {} rotations, factor now {}", count, self);
        count
    }

    /// Check whether every row is empty or starts at or past the diagonal
    pub fn is_upper_triangular(&self) -> bool {
        (0..self.num_rows()).all(|row| match self.get_row(row).first() {
            Some(col) => col >= row,
            None => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::DMatrix;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_single_rotation() {
        // A = [[3, 4], [1, 2]]; one rotation zeroes (1, 0)
        let mut m = SparseMatrix::new(2, 2);
        m.set(0, 0, 3.0);
        m.set(0, 1, 4.0);
        m.set(1, 0, 1.0);
        m.set(1, 1, 2.0);

        let count = m.triangulate();

        let r = 10.0_f64.sqrt();
        assert_eq!(count, 1);
        assert_abs_diff_eq!(m.get(0, 0), r, epsilon = 1e-9);
        assert_abs_diff_eq!(m.get(0, 1), 14.0 / r, epsilon = 1e-9);
        assert_eq!(m.get(1, 0), 0.0);
        assert_abs_diff_eq!(m.get(1, 1), 2.0 / r, epsilon = 1e-9);
        assert!(m.is_upper_triangular());
    }

    #[test]
    fn test_rotation_prunes_tiny_row() {
        let mut m = SparseMatrix::new(2, 2);
        m.set(0, 0, 1.0);
        m.set(1, 0, 1e-20);

        let count = m.triangulate();

        assert_eq!(count, 1);
        assert!(m.get_row(1).is_empty());
        assert_eq!(m.get_row(0).nnz(), 1);
        assert_abs_diff_eq!(m.get(0, 0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_apply_givens_returns_rotation() {
        let mut m = SparseMatrix::new(2, 1);
        m.set(0, 0, 3.0);
        m.set(1, 0, 4.0);

        let (c, s) = m.apply_givens(1, 0);

        assert_abs_diff_eq!(c * c + s * s, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(s * 3.0 + c * 4.0, 0.0, epsilon = 1e-15);
        assert_eq!(m.get(1, 0), 0.0);
    }

    #[test]
    #[should_panic(expected = "below the diagonal")]
    fn test_apply_givens_above_diagonal_panics() {
        let mut m = SparseMatrix::new(2, 2);
        m.set(0, 1, 1.0);
        m.apply_givens(0, 1);
    }

    #[test]
    fn test_triangulate_is_idempotent() {
        // random 20x20 at roughly 30% density
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut m = SparseMatrix::new(20, 20);
        for row in 0..20 {
            for col in 0..20 {
                if rng.gen::<f64>() < 0.3 {
                    m.set(row, col, rng.gen_range(-1.0..1.0));
                }
            }
        }

        let first = m.triangulate();
        assert!(first > 0);
        assert!(m.is_upper_triangular());

        let snapshot = m.clone();
        let second = m.triangulate();
        assert_eq!(second, 0);
        assert_eq!(m, snapshot);
    }

    #[test]
    fn test_triangulate_preserves_gram_matrix() {
        // Givens rotations are orthogonal, so R^T R must equal A^T A
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut m = SparseMatrix::new(12, 8);
        for row in 0..12 {
            for col in 0..8 {
                if rng.gen::<f64>() < 0.4 {
                    m.set(row, col, rng.gen_range(-2.0..2.0));
                }
            }
        }

        let a: DMatrix<f64> = m.to_dense();
        let gram_before = a.transpose() * &a;

        m.triangulate();
        let r: DMatrix<f64> = m.to_dense();
        let gram_after = r.transpose() * &r;

        for i in 0..8 {
            for j in 0..8 {
                assert_abs_diff_eq!(gram_after[(i, j)], gram_before[(i, j)], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_triangulate_tall_matrix_empties_bottom_rows() {
        let mut m = SparseMatrix::new(4, 2);
        m.set(0, 0, 1.0);
        m.set(1, 0, 1.0);
        m.set(1, 1, 1.0);
        m.set(2, 0, 1.0);
        m.set(2, 1, -1.0);
        m.set(3, 1, 2.0);

        m.triangulate();

        assert!(m.is_upper_triangular());
        // rows past the column count carry no information after the sweep
        assert!(m.get_row(2).is_empty());
        assert!(m.get_row(3).is_empty());
    }

    #[test]
    fn test_empty_matrix_is_upper_triangular() {
        let mut m = SparseMatrix::new(0, 0);
        assert!(m.is_upper_triangular());
        assert_eq!(m.triangulate(), 0);
    }
}
