//! Givens rotation kernel
//!
//! A Givens rotation is the 2x2 orthogonal matrix `[[c, -s], [s, c]]` that
//! zeroes the second component of a 2-vector. The triangulation driver uses
//! it to zero sub-diagonal entries one at a time, merging the pivot row and
//! the target row in a single monotone pass over their stored entries.

use crate::sparse_vector::SparseVector;
use crate::NUMERICAL_ZERO;

/// Compute the rotation `(c, s)` that zeroes `b` when applied to `[a; b]`.
///
/// Uses the standard numerically stable form: the larger of the two inputs
/// is used as the divisor, so the intermediate ratio never exceeds 1 in
/// magnitude. Satisfies `c*a - s*b = +-sqrt(a^2 + b^2)` and `s*a + c*b = 0`.
pub fn givens(a: f64, b: f64) -> (f64, f64) {
    if b == 0.0 {
        (1.0, 0.0)
    } else if b.abs() > a.abs() {
        let t = -a / b;
        let s = 1.0 / (1.0 + t * t).sqrt();
        (s * t, s)
    } else {
        let t = -b / a;
        let c = 1.0 / (1.0 + t * t).sqrt();
        (c, c * t)
    }
}

/// Apply a rotation to a pair of sparse rows, producing the rotated pair.
///
/// Both inputs are walked jointly in ascending column order; at each merge
/// position the two rotated values are computed and kept only if their
/// magnitude reaches [`NUMERICAL_ZERO`]. Output rows grow by `append` only,
/// which keeps the merge O(nnz) overall.
pub(crate) fn rotate_rows(
    top: &SparseVector,
    bot: &SparseVector,
    c: f64,
    s: f64,
) -> (SparseVector, SparseVector) {
    // fill-in is bounded by the union of the two structures
    let max_nnz = top.nnz() + bot.nnz();
    let mut new_top = SparseVector::with_capacity(max_nnz);
    let mut new_bot = SparseVector::with_capacity(max_nnz);

    let mut top_iter = top.iter().peekable();
    let mut bot_iter = bot.iter().peekable();

    loop {
        let (index, val_top, val_bot) = match (top_iter.peek(), bot_iter.peek()) {
            (None, None) => break,
            (Some(&(it, vt)), None) => {
                top_iter.next();
                (it, vt, 0.0)
            }
            (None, Some(&(ib, vb))) => {
                bot_iter.next();
                (ib, 0.0, vb)
            }
            (Some(&(it, vt)), Some(&(ib, vb))) => match it.cmp(&ib) {
                std::cmp::Ordering::Less => {
                    top_iter.next();
                    (it, vt, 0.0)
                }
                std::cmp::Ordering::Greater => {
                    bot_iter.next();
                    (ib, 0.0, vb)
                }
                std::cmp::Ordering::Equal => {
                    top_iter.next();
                    bot_iter.next();
                    (it, vt, vb)
                }
            },
        };

        let rotated_top = c * val_top - s * val_bot;
        let rotated_bot = s * val_top + c * val_bot;
        if rotated_top.abs() >= NUMERICAL_ZERO {
            new_top.append(index, rotated_top);
        }
        if rotated_bot.abs() >= NUMERICAL_ZERO {
            new_bot.append(index, rotated_bot);
        }
    }

    (new_top, new_bot)
}
