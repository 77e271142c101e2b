//! Agglomerative hierarchical clustering: repeatedly merge the closest
//! pair of active clusters, recording each merge, until one cluster
//! remains. All four linkage variants share a compaction-by-swap scheme:
//! the merged-away slot is overwritten with the last active slot so the
//! working matrix keeps shrinking without ever moving the surviving rows
//! one at a time.

use log::info;

use crate::errors::ClusteringError;
use crate::kernels::{self, DistanceKernel};
use crate::matrix::ExpressionMatrix;

use super::distance_matrix::JaggedDistanceMatrix;
use super::linkage::Linkage;

/// Identity of a node in the merge tree: an original object, or a cluster
/// created by an earlier merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// An original object, numbered `0..n_objects`.
    Leaf(usize),
    /// The cluster created at merge step `step` (0-based).
    Internal(usize),
}

impl Node {
    /// Encodes this node using the signed-integer convention some callers
    /// expect at a serialisation boundary: non-negative for a leaf,
    /// `-(step + 1)` for the cluster created at merge `step`.
    pub fn to_signed(self) -> i64 {
        match self {
            Node::Leaf(i) => i as i64,
            Node::Internal(step) => -((step as i64) + 1),
        }
    }

    /// Inverse of [`Node::to_signed`].
    pub fn from_signed(value: i64) -> Self {
        if value >= 0 {
            Node::Leaf(value as usize)
        } else {
            Node::Internal((-value - 1) as usize)
        }
    }
}

/// One step of the agglomeration: the two children merged and the linkage
/// distance at which they were merged.
#[derive(Debug, Clone, Copy)]
pub struct Merge {
    pub left: Node,
    pub right: Node,
    pub distance: f64,
}

/// Square, symmetric working copy of the distance matrix the engines
/// mutate in place. Unlike the externally-exposed `JaggedDistanceMatrix`,
/// this keeps a full `n x n` layout (only `0..order` is live at any time)
/// because it makes the swap-compaction step a single row swap plus one
/// column fixup.
struct WorkingMatrix {
    order: usize,
    sizes: Vec<usize>,
    ids: Vec<Node>,
    matrix: Vec<Vec<f64>>,
}

impl WorkingMatrix {
    fn from_jagged(d: &JaggedDistanceMatrix) -> Self {
        let n = d.n_objects();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix[i][j] = d.get(i, j);
                }
            }
        }
        WorkingMatrix { order: n, sizes: vec![1; n], ids: (0..n).map(Node::Leaf).collect(), matrix }
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[i][j]
    }

    fn set(&mut self, i: usize, j: usize, v: f64) {
        self.matrix[i][j] = v;
        self.matrix[j][i] = v;
    }

    /// Finds the off-diagonal minimum, scanning row-major with `lo < hi`.
    /// The scan's starting candidate is `(lo, hi) = (0, 1)`, i.e. the
    /// distance at `(1, 0)` — a legitimate first candidate, not a sentinel.
    fn closest(&self) -> (usize, usize) {
        let mut lo = 0usize;
        let mut hi = 1usize;
        let mut best = self.matrix[1][0];
        for j in 1..self.order {
            for i in 0..j {
                if self.matrix[j][i] < best {
                    best = self.matrix[j][i];
                    lo = i;
                    hi = j;
                }
            }
        }
        (lo, hi)
    }

    /// Removes slot `removed` by swapping the last active slot into it,
    /// then shrinking `order` by one.
    fn compact(&mut self, removed: usize) {
        self.order -= 1;
        let last = self.order;
        if removed != last {
            self.matrix.swap(removed, last);
            self.sizes.swap(removed, last);
            self.ids.swap(removed, last);
            for x in 0..self.order {
                let v = self.matrix[removed][x];
                self.matrix[x][removed] = v;
            }
        }
    }
}

/// Runs single/complete/average-linkage agglomerative clustering over a
/// precomputed jagged distance matrix. Does not need the original
/// expression data.
fn linked_cluster(distances: &JaggedDistanceMatrix, linkage: Linkage) -> Vec<Merge> {
    let mut working = WorkingMatrix::from_jagged(distances);
    let mut merges = Vec::with_capacity(working.order - 1);
    let mut step = 0usize;

    while working.order > 1 {
        let (lo, hi) = working.closest();
        let merge_distance = working.get(lo, hi);
        let left = working.ids[lo];
        let right = working.ids[hi];

        for x in 0..working.order {
            if x == lo || x == hi {
                continue;
            }
            let d_lo = working.get(lo, x);
            let d_hi = working.get(hi, x);
            let updated = linkage.merge(d_lo, d_hi, working.sizes[lo], working.sizes[hi]);
            working.set(lo, x, updated);
        }
        working.sizes[lo] += working.sizes[hi];
        working.ids[lo] = Node::Internal(step);

        info!("merging {left:?} and {right:?} at distance {merge_distance} ({linkage:?})");
        merges.push(Merge { left, right, distance: merge_distance });

        working.compact(hi);
        step += 1;
    }
    merges
}

/// Runs centroid-linkage agglomerative clustering. Unlike the other three
/// variants, this one always needs the original expression data: each
/// active node carries an explicit centroid (a leaf's own row, or the
/// count-weighted mean of its two children's centroids), and distances to
/// it are recomputed with the distance kernel rather than updated in place.
fn centroid_cluster(matrix: &ExpressionMatrix, kernel: DistanceKernel, transpose: bool, distances: &JaggedDistanceMatrix) -> Vec<Merge> {
    let n_features = matrix.n_features(transpose);
    let n_objects = matrix.n_objects(transpose);
    let weight: Vec<f64> = (0..n_features).map(|k| matrix.weight(k)).collect();

    let mut node_data: Vec<Vec<f64>> = (0..n_objects)
        .map(|obj| (0..n_features).map(|k| matrix.value(obj, k, transpose)).collect())
        .collect();
    let mut node_mask: Vec<Vec<bool>> = (0..n_objects)
        .map(|obj| (0..n_features).map(|k| matrix.present(obj, k, transpose)).collect())
        .collect();
    let mut working = WorkingMatrix::from_jagged(distances);

    let mut merges = Vec::with_capacity(n_objects - 1);
    let mut step = 0usize;

    while working.order > 1 {
        let (lo, hi) = working.closest();
        let merge_distance = working.get(lo, hi);
        let left = working.ids[lo];
        let right = working.ids[hi];

        let n_lo = working.sizes[lo] as f64;
        let n_hi = working.sizes[hi] as f64;
        let mut new_data = vec![0.0; n_features];
        let mut new_mask = vec![false; n_features];
        for k in 0..n_features {
            match (node_mask[lo][k], node_mask[hi][k]) {
                (true, true) => {
                    new_data[k] = (n_lo * node_data[lo][k] + n_hi * node_data[hi][k]) / (n_lo + n_hi);
                    new_mask[k] = true;
                }
                (true, false) => {
                    new_data[k] = node_data[lo][k];
                    new_mask[k] = true;
                }
                (false, true) => {
                    new_data[k] = node_data[hi][k];
                    new_mask[k] = true;
                }
                (false, false) => {}
            }
        }

        for x in 0..working.order {
            if x == lo || x == hi {
                continue;
            }
            let d = kernels::eval(kernel, n_features, &weight, &new_data, &new_mask, &node_data[x], &node_mask[x]);
            working.set(lo, x, d);
        }
        node_data[lo] = new_data;
        node_mask[lo] = new_mask;
        working.sizes[lo] += working.sizes[hi];
        working.ids[lo] = Node::Internal(step);

        info!("merging {left:?} and {right:?} at distance {merge_distance} (centroid)");
        merges.push(Merge { left, right, distance: merge_distance });

        working.compact(hi);
        node_data.swap(hi, working.order);
        node_mask.swap(hi, working.order);
        step += 1;
    }
    merges
}

/// Builds the agglomeration tree for `matrix`'s objects under `kernel` and
/// `linkage`. Builds its own distance matrix when `precomputed` is `None`.
/// When `scale` is true, every linkage distance is divided by the jagged
/// matrix's `scale_for(kernel)`. Fails if there are fewer than two objects.
pub fn tree_cluster(
    matrix: &ExpressionMatrix,
    kernel: DistanceKernel,
    linkage: Linkage,
    transpose: bool,
    scale: bool,
    precomputed: Option<&JaggedDistanceMatrix>,
) -> Result<Vec<Merge>, ClusteringError> {
    let n_objects = matrix.n_objects(transpose);
    if n_objects < 2 {
        return Err(ClusteringError::TooFewObjects { n_objects });
    }

    let owned;
    let distances = match precomputed {
        Some(d) => d,
        None => {
            owned = JaggedDistanceMatrix::build(matrix, kernel, transpose)?;
            &owned
        }
    };

    let mut merges = if linkage == Linkage::Centroid {
        centroid_cluster(matrix, kernel, transpose, distances)
    } else {
        linked_cluster(distances, linkage)
    };

    if scale {
        let divisor = distances.scale_for(kernel);
        if divisor > 0.0 {
            for m in &mut merges {
                m.distance /= divisor;
            }
        }
    }

    Ok(merges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_single_linkage_has_three_unit_merges() {
        let matrix = ExpressionMatrix::new(
            vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
            vec![vec![true, true]; 4],
            vec![1.0, 1.0],
        );
        let merges = tree_cluster(&matrix, DistanceKernel::Euclidean, Linkage::Single, false, false, None).unwrap();
        assert_eq!(merges.len(), 3);
        for m in &merges {
            assert!((m.distance - 1.0).abs() < 1e-9, "unexpected linkage distance {}", m.distance);
        }
    }

    #[test]
    fn node_id_encoding_round_trips() {
        assert_eq!(Node::from_signed(Node::Leaf(3).to_signed()), Node::Leaf(3));
        assert_eq!(Node::from_signed(Node::Internal(2).to_signed()), Node::Internal(2));
        assert_eq!(Node::Internal(0).to_signed(), -1);
    }

    #[test]
    fn fewer_than_two_objects_is_an_error() {
        let matrix = ExpressionMatrix::new(vec![vec![1.0]], vec![vec![true]], vec![1.0]);
        let result = tree_cluster(&matrix, DistanceKernel::Euclidean, Linkage::Single, false, false, None);
        assert!(matches!(result, Err(ClusteringError::TooFewObjects { .. })));
    }

    #[test]
    fn centroid_linkage_merges_all_objects() {
        let matrix = ExpressionMatrix::new(
            vec![vec![0.0], vec![1.0], vec![10.0]],
            vec![vec![true]; 3],
            vec![1.0],
        );
        let merges = tree_cluster(&matrix, DistanceKernel::Euclidean, Linkage::Centroid, false, false, None).unwrap();
        assert_eq!(merges.len(), 2);
    }
}
