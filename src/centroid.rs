//! Centroid construction for the k-partition engine: per-cluster mean or
//! median over present feature values.

use crate::matrix::{CentroidBlock, ExpressionMatrix};
use crate::numeric::{mean, median};

/// Which statistic summarises a cluster's members into its centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentroidMethod {
    /// `a` — arithmetic mean of present values.
    Mean,
    /// `m` — per-feature median of present values.
    Median,
}

impl CentroidMethod {
    /// Maps a tag character to a method, defaulting to [`CentroidMethod::Mean`]
    /// for any character other than `a`/`m`.
    pub fn from_tag(tag: char) -> Self {
        match tag {
            'm' => CentroidMethod::Median,
            _ => CentroidMethod::Mean,
        }
    }

    pub fn tag(self) -> char {
        match self {
            CentroidMethod::Mean => 'a',
            CentroidMethod::Median => 'm',
        }
    }
}

/// Builds a `k_clusters`-row centroid block from `matrix`'s objects and the
/// current `clusterid` assignment. A centroid feature is undefined (masked
/// out, value 0) when no member of the cluster has that feature present.
pub fn build_centroids(
    matrix: &ExpressionMatrix,
    clusterid: &[usize],
    k_clusters: usize,
    transpose: bool,
    method: CentroidMethod,
) -> CentroidBlock {
    let n_features = matrix.n_features(transpose);
    let mut centroids = CentroidBlock::new(k_clusters, n_features);

    for cluster in 0..k_clusters {
        let members: Vec<usize> = clusterid
            .iter()
            .enumerate()
            .filter_map(|(obj, &c)| if c == cluster { Some(obj) } else { None })
            .collect();

        for feature in 0..n_features {
            let present_values: Vec<f64> = members
                .iter()
                .filter(|&&obj| matrix.present(obj, feature, transpose))
                .map(|&obj| matrix.value(obj, feature, transpose))
                .collect();

            if present_values.is_empty() {
                centroids.set(cluster, feature, 0.0, false);
            } else {
                let value = match method {
                    CentroidMethod::Mean => mean(&present_values),
                    CentroidMethod::Median => median(&present_values),
                };
                centroids.set(cluster, feature, value, true);
            }
        }
    }
    centroids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_centroid_of_two_objects() {
        let matrix = ExpressionMatrix::new(
            vec![vec![0.0, 0.0], vec![0.0, 2.0]],
            vec![vec![true, true], vec![true, true]],
            vec![1.0, 1.0],
        );
        let clusterid = [0, 0];
        let centroids = build_centroids(&matrix, &clusterid, 1, false, CentroidMethod::Mean);
        assert_eq!(centroids.value(0, 0), 0.0);
        assert_eq!(centroids.value(0, 1), 1.0);
    }

    #[test]
    fn missing_feature_across_whole_cluster_is_undefined() {
        let matrix = ExpressionMatrix::new(
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![vec![true, false], vec![true, false]],
            vec![1.0, 1.0],
        );
        let clusterid = [0, 0];
        let centroids = build_centroids(&matrix, &clusterid, 1, false, CentroidMethod::Mean);
        assert!(centroids.present(0, 0));
        assert!(!centroids.present(0, 1));
    }
}
