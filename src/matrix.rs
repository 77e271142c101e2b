//! The expression data block: a dense matrix of measurements, a parallel
//! mask of which entries are present, and a weight vector — plus the
//! transpose-aware accessors the distance kernels and clustering engines
//! read through.

/// A dense expression matrix together with its presence mask and feature
/// weights. Rows are objects, columns are features, unless `transpose` is
/// set on the call that consumes it, in which case the roles swap.
#[derive(Debug, Clone)]
pub struct ExpressionMatrix {
    data: Vec<Vec<f64>>,
    mask: Vec<Vec<bool>>,
    weight: Vec<f64>,
}

impl ExpressionMatrix {
    /// Builds a new matrix from `data`, a `mask` of the same shape, and a
    /// `weight` vector. `weight` has one entry per column (the feature
    /// axis when `transpose` is false).
    ///
    /// # Panics
    /// Panics if `mask`'s shape does not match `data`'s.
    pub fn new(data: Vec<Vec<f64>>, mask: Vec<Vec<bool>>, weight: Vec<f64>) -> Self {
        assert_eq!(data.len(), mask.len(), "data and mask must have the same number of rows");
        for (d_row, m_row) in data.iter().zip(mask.iter()) {
            assert_eq!(d_row.len(), m_row.len(), "data and mask rows must have the same length");
        }
        ExpressionMatrix { data, mask, weight }
    }

    /// Number of rows (objects when not transposed).
    pub fn n_rows(&self) -> usize {
        self.data.len()
    }

    /// Number of columns (features when not transposed), 0 if there are no rows.
    pub fn n_cols(&self) -> usize {
        self.data.first().map_or(0, |r| r.len())
    }

    /// Number of objects under the given orientation.
    pub fn n_objects(&self, transpose: bool) -> usize {
        if transpose { self.n_cols() } else { self.n_rows() }
    }

    /// Number of features under the given orientation.
    pub fn n_features(&self, transpose: bool) -> usize {
        if transpose { self.n_rows() } else { self.n_cols() }
    }

    /// The weight assigned to feature `k` under the given orientation.
    pub fn weight(&self, k: usize) -> f64 {
        self.weight[k]
    }

    /// Value of object `obj`'s feature `k`, honoring `transpose`.
    pub fn value(&self, obj: usize, k: usize, transpose: bool) -> f64 {
        if transpose { self.data[k][obj] } else { self.data[obj][k] }
    }

    /// Whether object `obj`'s feature `k` is present, honoring `transpose`.
    pub fn present(&self, obj: usize, k: usize, transpose: bool) -> bool {
        if transpose { self.mask[k][obj] } else { self.mask[obj][k] }
    }

    /// Direct read access to the underlying data rows.
    pub fn raw_data(&self) -> &[Vec<f64>] {
        &self.data
    }

    /// Direct read access to the underlying mask rows.
    pub fn raw_mask(&self) -> &[Vec<bool>] {
        &self.mask
    }
}

/// A centroid block: per-cluster summary vectors with their own mask
/// (a centroid feature is undefined if no member of the cluster had it
/// present).
#[derive(Debug, Clone)]
pub struct CentroidBlock {
    data: Vec<Vec<f64>>,
    mask: Vec<Vec<bool>>,
}

impl CentroidBlock {
    /// Allocates a `k_clusters x n_features` block, all entries undefined.
    pub fn new(k_clusters: usize, n_features: usize) -> Self {
        CentroidBlock {
            data: vec![vec![0.0; n_features]; k_clusters],
            mask: vec![vec![false; n_features]; k_clusters],
        }
    }

    pub fn n_clusters(&self) -> usize {
        self.data.len()
    }

    pub fn n_features(&self) -> usize {
        self.data.first().map_or(0, |r| r.len())
    }

    pub fn value(&self, cluster: usize, k: usize) -> f64 {
        self.data[cluster][k]
    }

    pub fn present(&self, cluster: usize, k: usize) -> bool {
        self.mask[cluster][k]
    }

    pub fn set(&mut self, cluster: usize, k: usize, value: f64, present: bool) {
        self.data[cluster][k] = value;
        self.mask[cluster][k] = present;
    }

    /// Exposes a single cluster's centroid as a one-row `ExpressionMatrix`-
    /// compatible pair so it can be fed straight into a distance kernel.
    pub fn row(&self, cluster: usize) -> (&[f64], &[bool]) {
        (&self.data[cluster], &self.mask[cluster])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_swaps_axes() {
        let m = ExpressionMatrix::new(
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            vec![vec![true, true, true], vec![true, true, true]],
            vec![1.0, 1.0, 1.0],
        );
        assert_eq!(m.n_objects(false), 2);
        assert_eq!(m.n_features(false), 3);
        assert_eq!(m.n_objects(true), 3);
        assert_eq!(m.n_features(true), 2);
        assert_eq!(m.value(1, 0, true), 2.0);
        assert_eq!(m.value(0, 1, false), 2.0);
    }
}
