//! k-means / k-medians partitioning: random initial assignment, an EM
//! reassignment loop guarded against emptying a cluster and against
//! limit cycles, and a multi-restart driver that keeps the best result
//! found so far, tracking how many restarts reproduced it up to a
//! cluster-label permutation.

use log::{debug, info};

use crate::centroid::{build_centroids, CentroidMethod};
use crate::errors::ClusteringError;
use crate::kernels::{distance_to_centroid, DistanceKernel};
use crate::matrix::{CentroidBlock, ExpressionMatrix};
use crate::rng::RandomSource;

/// Assigns each object to one of `k_clusters` clusters: `k_clusters`
/// distinct objects (chosen via a random permutation) seed one cluster
/// each, and every remaining object is assigned to a uniformly random
/// cluster.
pub fn random_assign(n_objects: usize, k_clusters: usize, rng: &mut impl RandomSource) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n_objects).collect();
    rng.shuffle(&mut order);
    let mut clusterid = vec![0usize; n_objects];
    for (i, &obj) in order.iter().enumerate().take(k_clusters) {
        clusterid[obj] = i;
    }
    for &obj in order.iter().skip(k_clusters) {
        clusterid[obj] = rng.uniform_index(0, k_clusters);
    }
    clusterid
}

/// Outcome of one EM pass: the converged assignment, its centroids, and
/// the total within-cluster distance.
pub struct EmResult {
    pub clusterid: Vec<usize>,
    pub centroids: CentroidBlock,
    pub error: f64,
}

/// Runs one EM pass to local convergence: reassign objects to their
/// nearest centroid, rebuild centroids, repeat. An object is never moved
/// out of a cluster that would thereby become empty. A limit cycle is
/// detected by comparing the current assignment against periodic
/// snapshots taken at a doubling interval.
pub fn em_pass(
    matrix: &ExpressionMatrix,
    k_clusters: usize,
    transpose: bool,
    kernel: DistanceKernel,
    method: CentroidMethod,
    rng: &mut impl RandomSource,
) -> EmResult {
    let n_objects = matrix.n_objects(transpose);
    let mut clusterid = random_assign(n_objects, k_clusters, rng);
    let mut counts = vec![0usize; k_clusters];
    for &c in &clusterid {
        counts[c] += 1;
    }

    let mut snapshot = clusterid.clone();
    let mut period = 10usize;
    let mut iteration = 0usize;

    loop {
        let centroids = build_centroids(matrix, &clusterid, k_clusters, transpose, method);
        let mut order: Vec<usize> = (0..n_objects).collect();
        rng.shuffle(&mut order);

        let mut changed = false;
        for &obj in &order {
            let current = clusterid[obj];
            if counts[current] <= 1 {
                continue;
            }
            let mut best_cluster = current;
            let mut best_distance = distance_to_centroid(kernel, matrix, obj, transpose, &centroids, current);
            for cluster in 0..k_clusters {
                if cluster == current {
                    continue;
                }
                let d = distance_to_centroid(kernel, matrix, obj, transpose, &centroids, cluster);
                if d < best_distance {
                    best_distance = d;
                    best_cluster = cluster;
                }
            }
            if best_cluster != current {
                counts[current] -= 1;
                counts[best_cluster] += 1;
                clusterid[obj] = best_cluster;
                changed = true;
            }
        }

        iteration += 1;
        debug!("k-partition sweep {iteration}: changed = {changed}");
        if !changed {
            break;
        }
        if iteration % period == 0 {
            if clusterid == snapshot {
                debug!("k-partition cycle detected after {iteration} sweeps");
                break;
            }
            snapshot = clusterid.clone();
            period *= 2;
        }
    }

    let centroids = build_centroids(matrix, &clusterid, k_clusters, transpose, method);
    let error = (0..n_objects)
        .map(|obj| distance_to_centroid(kernel, matrix, obj, transpose, &centroids, clusterid[obj]))
        .sum();

    EmResult { clusterid, centroids, error }
}

/// Final outcome of `kcluster`: the best assignment found across `npass`
/// restarts, its centroids and total error, and `ifound`, the number of
/// restarts (including the best one itself) that reproduced it up to a
/// permutation of cluster labels.
pub struct KClusterOutcome {
    pub clusterid: Vec<usize>,
    pub centroids: CentroidBlock,
    pub error: f64,
    pub ifound: usize,
}

/// Runs `npass` independent EM restarts and keeps the lowest-error result,
/// counting how many restarts reproduce it up to a cluster-label
/// permutation. Fails if there are fewer objects than requested clusters.
pub fn kcluster(
    matrix: &ExpressionMatrix,
    k_clusters: usize,
    transpose: bool,
    kernel: DistanceKernel,
    method: CentroidMethod,
    npass: usize,
    rng: &mut impl RandomSource,
) -> Result<KClusterOutcome, ClusteringError> {
    let n_objects = matrix.n_objects(transpose);
    if n_objects < k_clusters {
        return Err(ClusteringError::TooFewObjectsForClusters { n_objects, k_clusters });
    }

    let mut best = em_pass(matrix, k_clusters, transpose, kernel, method, rng);
    let mut ifound = 1usize;
    info!("k-partition restart 1/{npass}: error = {}", best.error);

    for pass in 1..npass {
        let candidate = em_pass(matrix, k_clusters, transpose, kernel, method, rng);
        info!("k-partition restart {}/{npass}: error = {}", pass + 1, candidate.error);
        if is_relabelling(&candidate.clusterid, &best.clusterid, k_clusters) {
            ifound += 1;
        } else if candidate.error < best.error {
            best = candidate;
            ifound = 1;
        }
    }

    Ok(KClusterOutcome { clusterid: best.clusterid, centroids: best.centroids, error: best.error, ifound })
}

/// True if `candidate` equals `baseline` after relabelling clusters by a
/// single permutation, i.e. there is a bijection `f` with
/// `f(candidate[i]) == baseline[i]` for every object `i`.
fn is_relabelling(candidate: &[usize], baseline: &[usize], k_clusters: usize) -> bool {
    let mut forward: Vec<Option<usize>> = vec![None; k_clusters];
    let mut used = vec![false; k_clusters];
    for (&c, &b) in candidate.iter().zip(baseline.iter()) {
        match forward[c] {
            Some(mapped) if mapped != b => return false,
            Some(_) => {}
            None => {
                if used[b] {
                    return false;
                }
                forward[c] = Some(b);
                used[b] = true;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SmallRngSource;

    fn two_tight_clusters() -> ExpressionMatrix {
        ExpressionMatrix::new(
            vec![
                vec![1.0, 2.0, 3.0],
                vec![1.0, 2.0, 3.0],
                vec![10.0, 20.0, 30.0],
            ],
            vec![vec![true; 3]; 3],
            vec![1.0, 1.0, 1.0],
        )
    }

    #[test]
    fn kcluster_separates_the_obvious_pair() {
        let matrix = two_tight_clusters();
        let mut rng = SmallRngSource::from_seed(7);
        let outcome = kcluster(
            &matrix,
            2,
            false,
            DistanceKernel::Euclidean,
            CentroidMethod::Mean,
            10,
            &mut rng,
        )
        .unwrap();
        assert_eq!(outcome.clusterid[0], outcome.clusterid[1]);
        assert_ne!(outcome.clusterid[0], outcome.clusterid[2]);
        assert!(outcome.error.abs() < 1e-9);
        assert!(outcome.ifound >= 1);
    }

    #[test]
    fn too_few_objects_is_an_error() {
        let matrix = two_tight_clusters();
        let mut rng = SmallRngSource::from_seed(1);
        let result = kcluster(&matrix, 5, false, DistanceKernel::Euclidean, CentroidMethod::Mean, 1, &mut rng);
        assert!(matches!(result, Err(ClusteringError::TooFewObjectsForClusters { .. })));
    }

    #[test]
    fn relabelling_detects_permuted_assignments() {
        assert!(is_relabelling(&[1, 1, 0], &[0, 0, 1], 2));
        assert!(!is_relabelling(&[0, 1, 0], &[0, 0, 1], 2));
    }
}
