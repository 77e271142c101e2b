use expr_cluster::kernels::{distance, DistanceKernel};
use expr_cluster::matrix::ExpressionMatrix;

#[test]
fn pearson_distance_of_perfectly_anticorrelated_rows_is_two() {
    let matrix = ExpressionMatrix::new(
        vec![vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![5.0, 4.0, 3.0, 2.0, 1.0]],
        vec![vec![true; 5]; 2],
        vec![1.0; 5],
    );
    let d = distance(DistanceKernel::Pearson, &matrix, 0, 1, false);
    assert!((d - 2.0).abs() < 1e-9);
}

#[test]
fn uncentred_distance_of_proportional_rows_is_zero() {
    let matrix = ExpressionMatrix::new(
        vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]],
        vec![vec![true; 3]; 2],
        vec![1.0; 3],
    );
    let d = distance(DistanceKernel::Uncentred, &matrix, 0, 1, false);
    assert!(d.abs() < 1e-9);
}

#[test]
fn euclidean_with_fully_masked_pair_is_zero() {
    let matrix = ExpressionMatrix::new(
        vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]],
        vec![vec![true, true, true], vec![false, false, false]],
        vec![1.0; 3],
    );
    let d = distance(DistanceKernel::Euclidean, &matrix, 0, 1, false);
    assert_eq!(d, 0.0);
}

#[test]
fn every_kernel_is_symmetric_nonnegative_and_zero_on_diagonal() {
    let matrix = ExpressionMatrix::new(
        vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![2.0, 1.0, 5.0, 1.0],
            vec![7.0, 7.0, 0.5, 9.0],
        ],
        vec![vec![true, true, false, true], vec![true, true, true, true], vec![true, false, true, true]],
        vec![1.0, 0.5, 2.0, 1.0],
    );
    for tag in ['e', 'h', 'c', 'a', 'u', 'x', 's', 'k'] {
        let kernel = DistanceKernel::from_tag(tag);
        for i in 0..3 {
            assert!(distance(kernel, &matrix, i, i, false).abs() < 1e-9, "kernel {tag} object {i}");
            for j in 0..3 {
                let dij = distance(kernel, &matrix, i, j, false);
                let dji = distance(kernel, &matrix, j, i, false);
                assert!(dij >= 0.0, "kernel {tag} negative distance");
                assert!((dij - dji).abs() < 1e-9, "kernel {tag} asymmetric at ({i},{j})");
            }
        }
    }
}

#[test]
fn unknown_tag_falls_back_to_euclidean() {
    let matrix = ExpressionMatrix::new(
        vec![vec![0.0, 0.0], vec![3.0, 4.0]],
        vec![vec![true, true]; 2],
        vec![1.0, 1.0],
    );
    let fallback = distance(DistanceKernel::from_tag('?'), &matrix, 0, 1, false);
    let euclid = distance(DistanceKernel::Euclidean, &matrix, 0, 1, false);
    assert_eq!(fallback, euclid);
}
