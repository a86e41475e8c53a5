//! Cost matrices and minimum-cost assignment.

use log::warn;
use ndarray::Array2;

use crate::geometry::Point2;

/// Cost of the dummy rows/columns that make a rectangular problem square.
/// Any constant works: every dummy contributes the same amount to each
/// complete assignment.
const PADDING_COST: f64 = 1e6;

/// Pairwise Euclidean distances, shape `(rows.len(), cols.len())`.
pub fn euclidean_distance(rows: &[Point2], cols: &[Point2]) -> Array2<f64> {
    let mut dists = Array2::zeros((rows.len(), cols.len()));
    for (i, a) in rows.iter().enumerate() {
        for (j, b) in cols.iter().enumerate() {
            dists[[i, j]] = nalgebra::distance(a, b);
        }
    }
    dists
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    /// `(row, col)` pairs with a cost strictly below the threshold.
    pub matches: Vec<(usize, usize)>,
    pub unmatched_rows: Vec<usize>,
    pub unmatched_cols: Vec<usize>,
}

/// Solve the minimum-cost assignment over `cost_matrix` and keep the pairs
/// whose cost is strictly below `thresh`.
///
/// Rectangular matrices are padded to square; rows or columns paired with
/// padding are reported unmatched. An empty side yields no matches. The
/// solver is deterministic, so identical inputs give identical pairings.
pub fn linear_assignment(cost_matrix: &Array2<f64>, thresh: f64) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 || num_cols == 0 {
        return AssignmentResult {
            matches: vec![],
            unmatched_rows: (0..num_rows).collect(),
            unmatched_cols: (0..num_cols).collect(),
        };
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), PADDING_COST);
    padded
        .slice_mut(ndarray::s![..num_rows, ..num_cols])
        .assign(cost_matrix);

    let mut matches = vec![];
    let mut unmatched_rows = vec![];
    let mut unmatched_cols_mask = vec![true; num_cols];

    match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => {
            for (row_idx, &col_idx) in row_to_col.iter().enumerate().take(num_rows) {
                if col_idx < num_cols && cost_matrix[[row_idx, col_idx]] < thresh {
                    matches.push((row_idx, col_idx));
                    unmatched_cols_mask[col_idx] = false;
                } else {
                    unmatched_rows.push(row_idx);
                }
            }
        }
        Err(err) => {
            warn!("assignment solver failed on a {num_rows}x{num_cols} matrix: {err:?}");
            unmatched_rows = (0..num_rows).collect();
        }
    }

    let unmatched_cols = unmatched_cols_mask
        .iter()
        .enumerate()
        .filter_map(|(i, &u)| u.then_some(i))
        .collect();

    AssignmentResult {
        matches,
        unmatched_rows,
        unmatched_cols,
    }
}
