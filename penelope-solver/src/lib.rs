//! penelope-solver: incremental sparse QR for smoothing and mapping
//!
//! This crate maintains the upper-triangular factor R of a least-squares
//! information matrix as new measurement rows and state columns arrive.
//! Triangularity is restored by Givens rotations applied directly in sparse
//! row storage, so each update touches only the rows a new measurement
//! actually connects.

mod givens;
mod ops;
mod sparse_matrix;
mod sparse_vector;
mod triangulate;
mod triples;

pub use givens::givens;
pub use sparse_matrix::SparseMatrix;
pub use sparse_vector::{SparseVector, SparseVectorIter};

/// Values with magnitude below this are treated as structurally absent.
///
/// Rotations prune such values instead of storing them, trading bit-exact
/// agreement with a dense QR for sparsity.
pub const NUMERICAL_ZERO: f64 = 1e-12;

// Re-export nalgebra for convenience
pub use nalgebra;
