use std::collections::HashSet;

use expr_cluster::hierarchical::{tree_cluster, JaggedDistanceMatrix, Linkage, Node};
use expr_cluster::kernels::DistanceKernel;
use expr_cluster::matrix::ExpressionMatrix;

fn unit_square() -> ExpressionMatrix {
    ExpressionMatrix::new(
        vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
        vec![vec![true, true]; 4],
        vec![1.0, 1.0],
    )
}

#[test]
fn single_linkage_on_unit_square_has_three_unit_distance_merges() {
    let matrix = unit_square();
    let merges = tree_cluster(&matrix, DistanceKernel::Euclidean, Linkage::Single, false, false, None).unwrap();
    assert_eq!(merges.len(), 3);
    for m in &merges {
        assert!((m.distance - 1.0).abs() < 1e-9);
    }
}

#[test]
fn every_leaf_id_appears_exactly_once_across_merges() {
    let matrix = unit_square();
    for linkage in [Linkage::Single, Linkage::Complete, Linkage::Average, Linkage::Centroid] {
        let merges = tree_cluster(&matrix, DistanceKernel::Euclidean, linkage, false, false, None).unwrap();
        assert_eq!(merges.len(), 3);
        let mut leaves_seen = HashSet::new();
        let mut internal_ids_created = HashSet::new();
        for (step, m) in merges.iter().enumerate() {
            for child in [m.left, m.right] {
                match child {
                    Node::Leaf(i) => {
                        assert!(leaves_seen.insert(i), "leaf {i} merged twice under {linkage:?}");
                    }
                    Node::Internal(s) => {
                        assert!(internal_ids_created.contains(&s), "internal node {s} used before being created");
                    }
                }
            }
            internal_ids_created.insert(step);
        }
        assert_eq!(leaves_seen, (0..4).collect());
    }
}

#[test]
fn monotone_linkage_distances_under_single_linkage_only() {
    let matrix = ExpressionMatrix::new(
        vec![vec![0.0], vec![1.0], vec![2.0], vec![100.0]],
        vec![vec![true]; 4],
        vec![1.0],
    );
    let merges = tree_cluster(&matrix, DistanceKernel::Euclidean, Linkage::Single, false, false, None).unwrap();
    let distances: Vec<f64> = merges.iter().map(|m| m.distance).collect();
    for pair in distances.windows(2) {
        assert!(pair[0] <= pair[1] + 1e-9, "single linkage distances should be non-decreasing: {distances:?}");
    }
}

#[test]
fn jagged_matrix_entries_match_pairwise_kernel() {
    let matrix = unit_square();
    let jagged = JaggedDistanceMatrix::build(&matrix, DistanceKernel::Euclidean, false).unwrap();
    for i in 0..4 {
        for j in 0..4 {
            let expected = expr_cluster::kernels::distance(DistanceKernel::Euclidean, &matrix, i, j, false);
            assert!((jagged.get(i, j) - expected).abs() < 1e-9);
        }
    }
}

#[test]
fn scaling_divides_every_linkage_distance() {
    let matrix = unit_square();
    let unscaled = tree_cluster(&matrix, DistanceKernel::Euclidean, Linkage::Single, false, false, None).unwrap();
    let scaled = tree_cluster(&matrix, DistanceKernel::Euclidean, Linkage::Single, false, true, None).unwrap();
    let jagged = JaggedDistanceMatrix::build(&matrix, DistanceKernel::Euclidean, false).unwrap();
    let divisor = jagged.scale_for(DistanceKernel::Euclidean);
    for (u, s) in unscaled.iter().zip(scaled.iter()) {
        assert!((u.distance / divisor - s.distance).abs() < 1e-9);
    }
}

#[test]
fn fewer_than_two_objects_fails() {
    let matrix = ExpressionMatrix::new(vec![vec![1.0]], vec![vec![true]], vec![1.0]);
    let result = tree_cluster(&matrix, DistanceKernel::Euclidean, Linkage::Single, false, false, None);
    assert!(result.is_err());
}
