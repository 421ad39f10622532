//! Products and conversions against the dense collaborators
//!
//! Matrix-vector products iterate stored entries only; the dense and CSR
//! conversions bridge to `nalgebra` and `sprs` for callers that run
//! back-substitution or a downstream factorization.

use nalgebra::{DMatrix, DVector};
use sprs::{CsMat, TriMat};
use std::ops::Mul;

use crate::sparse_matrix::SparseMatrix;

impl SparseMatrix {
    /// Compute `self * rhs`.
    ///
    /// # Panics
    /// Panics on shape mismatch.
    pub fn mul_vector(&self, rhs: &DVector<f64>) -> DVector<f64> {
        assert!(
            self.num_cols() == rhs.nrows(),
            "SparseMatrix::mul_vector: {}x{} matrix incompatible with vector of length {}",
            self.num_rows(),
            self.num_cols(),
            rhs.nrows()
        );
        let mut res = DVector::zeros(self.num_rows());
        for row in 0..self.num_rows() {
            for (col, val) in self.get_row(row) {
                res[row] += val * rhs[col];
            }
        }
        res
    }

    /// Compute `self^T * rhs` with the same row iteration, accumulating
    /// into column indices instead of transposing the storage.
    ///
    /// # Panics
    /// Panics on shape mismatch.
    pub fn mul_transpose_vector(&self, rhs: &DVector<f64>) -> DVector<f64> {
        assert!(
            self.num_rows() == rhs.nrows(),
            "SparseMatrix::mul_transpose_vector: {}x{} matrix incompatible with vector of length {}",
            self.num_rows(),
            self.num_cols(),
            rhs.nrows()
        );
        let mut res = DVector::zeros(self.num_cols());
        for row in 0..self.num_rows() {
            for (col, val) in self.get_row(row) {
                res[col] += val * rhs[row];
            }
        }
        res
    }

    /// Copy a dense matrix into sparse form.
    ///
    /// Every entry is visited; exact zeros end up unstored, which keeps the
    /// no-stored-zeros invariant without any skip logic here.
    pub fn from_dense(m: &DMatrix<f64>) -> SparseMatrix {
        let mut s = SparseMatrix::new(m.nrows(), m.ncols());
        for row in 0..m.nrows() {
            for col in 0..m.ncols() {
                s.set(row, col, m[(row, col)]);
            }
        }
        s
    }

    /// Copy into a dense matrix, zeros filled explicitly
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(self.num_rows(), self.num_cols());
        for row in 0..self.num_rows() {
            for (col, val) in self.get_row(row) {
                m[(row, col)] = val;
            }
        }
        m
    }

    /// Convert to CSR for hand-off to downstream sparse solvers
    pub fn to_csr(&self) -> CsMat<f64> {
        let mut tri = TriMat::new((self.num_rows(), self.num_cols()));
        for row in 0..self.num_rows() {
            for (col, val) in self.get_row(row) {
                tri.add_triplet(row, col, val);
            }
        }
        tri.to_csr()
    }
}

impl Mul<&DVector<f64>> for &SparseMatrix {
    type Output = DVector<f64>;

    fn mul(self, rhs: &DVector<f64>) -> DVector<f64> {
        self.mul_vector(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn example_matrix() -> SparseMatrix {
        // [[1, 0, 2], [0, 3, 0]]
        let mut m = SparseMatrix::new(2, 3);
        m.set(0, 0, 1.0);
        m.set(0, 2, 2.0);
        m.set(1, 1, 3.0);
        m
    }

    #[test]
    fn test_mul_vector() {
        let m = example_matrix();
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let y = &m * &x;
        assert_eq!(y.as_slice(), &[7.0, 6.0]);
    }

    #[test]
    fn test_mul_transpose_vector() {
        let m = example_matrix();
        let x = DVector::from_vec(vec![5.0, 7.0]);
        let y = m.mul_transpose_vector(&x);
        assert_eq!(y.as_slice(), &[5.0, 21.0, 10.0]);
    }

    #[test]
    #[should_panic(expected = "incompatible")]
    fn test_mul_vector_shape_mismatch_panics() {
        let m = example_matrix();
        let x = DVector::from_vec(vec![1.0, 2.0]);
        m.mul_vector(&x);
    }

    #[test]
    fn test_dense_roundtrip() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let d = DMatrix::from_fn(5, 4, |_, _| {
            if rng.gen::<f64>() < 0.5 {
                rng.gen_range(-1.0..1.0)
            } else {
                0.0
            }
        });

        let s = SparseMatrix::from_dense(&d);
        let back = s.to_dense();
        assert_eq!(back, d);
    }

    #[test]
    fn test_mul_matches_dense() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let d = DMatrix::from_fn(6, 9, |_, _| {
            if rng.gen::<f64>() < 0.3 {
                rng.gen_range(-1.0..1.0)
            } else {
                0.0
            }
        });
        let s = SparseMatrix::from_dense(&d);
        let x = DVector::from_fn(9, |_, _| rng.gen_range(-1.0..1.0));

        let sparse_y = &s * &x;
        let dense_y = &d * &x;
        for i in 0..6 {
            assert_abs_diff_eq!(sparse_y[i], dense_y[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_to_csr() {
        let m = example_matrix();
        let csr = m.to_csr();
        assert_eq!(csr.nnz(), 3);
        assert_eq!(csr.get(0, 2), Some(&2.0));
        assert_eq!(csr.get(1, 1), Some(&3.0));
        assert_eq!(csr.get(1, 0), None);
    }
}
