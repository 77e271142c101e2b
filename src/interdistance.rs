//! Inter-cluster distance queries: given two lists of object indices and a
//! method, report a single distance between the clusters they name.

use crate::kernels::{self, distance, DistanceKernel};
use crate::matrix::ExpressionMatrix;
use crate::numeric::{mean, median};

/// The five inter-cluster distance reductions, selected by tag character.
/// Unlike [`crate::kernels::DistanceKernel`] and
/// [`crate::centroid::CentroidMethod`], an unrecognised tag here has no
/// default — see [`InterClusterMethod::from_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterClusterMethod {
    /// `a` — distance between the two clusters' mean centroids.
    MeanCentroid,
    /// `m` — distance between the two clusters' median centroids.
    MedianCentroid,
    /// `s` — minimum pairwise distance across the two clusters.
    MinPairwise,
    /// `x` — maximum pairwise distance across the two clusters.
    MaxPairwise,
    /// `v` — mean of all pairwise distances across the two clusters.
    MeanPairwise,
}

impl InterClusterMethod {
    /// Maps a tag character to a method. Returns `None` for any character
    /// outside `a m s x v`; callers should treat that as "return 0", per
    /// [`cluster_distance`]'s contract.
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'a' => Some(InterClusterMethod::MeanCentroid),
            'm' => Some(InterClusterMethod::MedianCentroid),
            's' => Some(InterClusterMethod::MinPairwise),
            'x' => Some(InterClusterMethod::MaxPairwise),
            'v' => Some(InterClusterMethod::MeanPairwise),
            _ => None,
        }
    }
}

fn centroid_of(matrix: &ExpressionMatrix, indices: &[usize], transpose: bool, median_based: bool) -> (Vec<f64>, Vec<bool>) {
    let n_features = matrix.n_features(transpose);
    let mut data = vec![0.0; n_features];
    let mut present = vec![false; n_features];
    for k in 0..n_features {
        let values: Vec<f64> = indices
            .iter()
            .filter(|&&obj| matrix.present(obj, k, transpose))
            .map(|&obj| matrix.value(obj, k, transpose))
            .collect();
        if !values.is_empty() {
            data[k] = if median_based { median(&values) } else { mean(&values) };
            present[k] = true;
        }
    }
    (data, present)
}

/// Distance between the clusters named by `cluster_a` and `cluster_b`
/// (index lists into `matrix`'s objects under `transpose`), reduced by
/// `method`. Returns 0 if either cluster is empty, if any index is out of
/// range, or if `method` is not one of `a m s x v`.
pub fn cluster_distance(
    matrix: &ExpressionMatrix,
    kernel: DistanceKernel,
    transpose: bool,
    method: char,
    cluster_a: &[usize],
    cluster_b: &[usize],
) -> f64 {
    let n_objects = matrix.n_objects(transpose);
    if cluster_a.is_empty() || cluster_b.is_empty() {
        return 0.0;
    }
    if cluster_a.iter().chain(cluster_b.iter()).any(|&i| i >= n_objects) {
        return 0.0;
    }
    let Some(method) = InterClusterMethod::from_tag(method) else {
        return 0.0;
    };

    let n_features = matrix.n_features(transpose);
    let weight: Vec<f64> = (0..n_features).map(|k| matrix.weight(k)).collect();

    match method {
        InterClusterMethod::MeanCentroid | InterClusterMethod::MedianCentroid => {
            let median_based = method == InterClusterMethod::MedianCentroid;
            let (a_vals, a_mask) = centroid_of(matrix, cluster_a, transpose, median_based);
            let (b_vals, b_mask) = centroid_of(matrix, cluster_b, transpose, median_based);
            kernels::eval(kernel, n_features, &weight, &a_vals, &a_mask, &b_vals, &b_mask)
        }
        InterClusterMethod::MinPairwise | InterClusterMethod::MaxPairwise | InterClusterMethod::MeanPairwise => {
            let pairwise: Vec<f64> = cluster_a
                .iter()
                .flat_map(|&i| cluster_b.iter().map(move |&j| (i, j)))
                .map(|(i, j)| distance(kernel, matrix, i, j, transpose))
                .collect();
            match method {
                InterClusterMethod::MinPairwise => pairwise.iter().copied().fold(f64::INFINITY, f64::min),
                InterClusterMethod::MaxPairwise => pairwise.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                InterClusterMethod::MeanPairwise => mean(&pairwise),
                _ => unreachable!(),
            }
        }
    }
}
