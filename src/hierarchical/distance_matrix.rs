//! The jagged (lower-triangular) pairwise distance matrix: row `i` holds
//! exactly `i` stored entries, row 0 is empty. Symmetry and a zero
//! diagonal are implicit rather than stored.

use crate::errors::ClusteringError;
use crate::kernels::{distance, DistanceKernel};
use crate::matrix::ExpressionMatrix;

/// A lower-triangular pairwise distance matrix over `n` objects.
#[derive(Debug, Clone)]
pub struct JaggedDistanceMatrix {
    rows: Vec<Vec<f64>>,
}

impl JaggedDistanceMatrix {
    /// Computes the full jagged distance matrix for `matrix`'s objects
    /// under `kernel` and the given orientation. Fails if there are fewer
    /// than two objects.
    pub fn build(matrix: &ExpressionMatrix, kernel: DistanceKernel, transpose: bool) -> Result<Self, ClusteringError> {
        let n = matrix.n_objects(transpose);
        if n < 2 {
            return Err(ClusteringError::TooFewObjects { n_objects: n });
        }
        let mut rows = Vec::with_capacity(n);
        rows.push(Vec::new());
        for i in 1..n {
            let row: Vec<f64> = (0..i).map(|j| distance(kernel, matrix, i, j, transpose)).collect();
            rows.push(row);
        }
        Ok(JaggedDistanceMatrix { rows })
    }

    /// Number of objects this matrix covers.
    pub fn n_objects(&self) -> usize {
        self.rows.len()
    }

    /// Distance between objects `i` and `j` (symmetric, zero on the diagonal).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            0.0
        } else if i > j {
            self.rows[i][j]
        } else {
            self.rows[j][i]
        }
    }

    /// Divisor that rescales linkage distances into a fixed range: 0.5 for
    /// the absolute-correlation kernels, half the maximum off-diagonal
    /// distance for the Euclidean/harmonic kernels, 1.0 otherwise.
    pub fn scale_for(&self, kernel: DistanceKernel) -> f64 {
        match kernel {
            DistanceKernel::AbsPearson | DistanceKernel::AbsUncentred => 0.5,
            DistanceKernel::Euclidean | DistanceKernel::Harmonic => {
                let max = self.rows.iter().flatten().copied().fold(0.0f64, f64::max);
                max / 2.0
            }
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jagged_shape_and_symmetry() {
        let matrix = ExpressionMatrix::new(
            vec![vec![0.0], vec![1.0], vec![3.0]],
            vec![vec![true]; 3],
            vec![1.0],
        );
        let d = JaggedDistanceMatrix::build(&matrix, DistanceKernel::Euclidean, false).unwrap();
        assert_eq!(d.n_objects(), 3);
        assert_eq!(d.get(0, 0), 0.0);
        assert_eq!(d.get(2, 1), d.get(1, 2));
        assert_eq!(d.get(2, 0), 9.0);
    }

    #[test]
    fn fewer_than_two_objects_is_an_error() {
        let matrix = ExpressionMatrix::new(vec![vec![1.0]], vec![vec![true]], vec![1.0]);
        let result = JaggedDistanceMatrix::build(&matrix, DistanceKernel::Euclidean, false);
        assert!(matches!(result, Err(ClusteringError::TooFewObjects { .. })));
    }
}
