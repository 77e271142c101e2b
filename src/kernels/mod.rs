//! Distance kernels over masked, weighted feature vectors.
//!
//! Every kernel shares one contract: feature count `n`, two value/mask
//! slices of length `n`, and a weight slice of length `n`. Element `k` is
//! *usable* only when both masks are set at `k`. Unknown tag characters
//! default to [`DistanceKernel::Euclidean`], matching the external contract
//! this crate preserves from its reference (see the crate's design notes).

mod kendall;
mod pearson;
mod rank;
mod weighted;

use crate::matrix::{CentroidBlock, ExpressionMatrix};

/// The eight supported dissimilarity measures, selected by tag character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceKernel {
    /// `e` — weighted Euclidean distance squared, scaled by `n / usable_weight`.
    Euclidean,
    /// `h` — weighted harmonic-mean Euclidean distance.
    Harmonic,
    /// `c` — one minus the weighted Pearson correlation.
    Pearson,
    /// `a` — one minus the absolute weighted Pearson correlation.
    AbsPearson,
    /// `u` — one minus the weighted uncentred correlation.
    Uncentred,
    /// `x` — one minus the absolute weighted uncentred correlation.
    AbsUncentred,
    /// `s` — one minus the unweighted Spearman rank correlation.
    Spearman,
    /// `k` — one minus a normalised Kendall tau.
    Kendall,
}

impl DistanceKernel {
    /// Maps a tag character to a kernel, defaulting to [`DistanceKernel::Euclidean`]
    /// for any character outside `e h c a u x s k`.
    pub fn from_tag(tag: char) -> Self {
        match tag {
            'h' => DistanceKernel::Harmonic,
            'c' => DistanceKernel::Pearson,
            'a' => DistanceKernel::AbsPearson,
            'u' => DistanceKernel::Uncentred,
            'x' => DistanceKernel::AbsUncentred,
            's' => DistanceKernel::Spearman,
            'k' => DistanceKernel::Kendall,
            _ => DistanceKernel::Euclidean,
        }
    }

    /// The tag character this kernel was selected by.
    pub fn tag(self) -> char {
        match self {
            DistanceKernel::Euclidean => 'e',
            DistanceKernel::Harmonic => 'h',
            DistanceKernel::Pearson => 'c',
            DistanceKernel::AbsPearson => 'a',
            DistanceKernel::Uncentred => 'u',
            DistanceKernel::AbsUncentred => 'x',
            DistanceKernel::Spearman => 's',
            DistanceKernel::Kendall => 'k',
        }
    }
}

/// Evaluates `kernel` over two raw feature rows. This is the single
/// dispatch point every higher-level helper (object-object, object-centroid,
/// centroid-centroid) funnels through.
pub(crate) fn eval(
    kernel: DistanceKernel,
    n: usize,
    weight: &[f64],
    a_vals: &[f64],
    a_mask: &[bool],
    b_vals: &[f64],
    b_mask: &[bool],
) -> f64 {
    match kernel {
        DistanceKernel::Euclidean => weighted::euclidean(n, weight, a_vals, a_mask, b_vals, b_mask),
        DistanceKernel::Harmonic => weighted::harmonic(n, weight, a_vals, a_mask, b_vals, b_mask),
        DistanceKernel::Pearson => pearson::pearson(weight, a_vals, a_mask, b_vals, b_mask, false),
        DistanceKernel::AbsPearson => pearson::pearson(weight, a_vals, a_mask, b_vals, b_mask, true),
        DistanceKernel::Uncentred => pearson::uncentred(weight, a_vals, a_mask, b_vals, b_mask, false),
        DistanceKernel::AbsUncentred => pearson::uncentred(weight, a_vals, a_mask, b_vals, b_mask, true),
        DistanceKernel::Spearman => rank::spearman(a_vals, a_mask, b_vals, b_mask),
        DistanceKernel::Kendall => kendall::kendall(a_vals, a_mask, b_vals, b_mask),
    }
}

/// Collects the usable `(a, b, weight)` triples shared by two masked rows.
pub(crate) fn usable_triples(
    weight: &[f64],
    a_vals: &[f64],
    a_mask: &[bool],
    b_vals: &[f64],
    b_mask: &[bool],
) -> Vec<(f64, f64, f64)> {
    a_vals
        .iter()
        .zip(a_mask.iter())
        .zip(b_vals.iter().zip(b_mask.iter()))
        .zip(weight.iter())
        .filter_map(|(((&a, &ma), (&b, &mb)), &w)| if ma && mb { Some((a, b, w)) } else { None })
        .collect()
}

/// Distance between object `i1` and object `i2` of the same matrix, under
/// the given orientation.
pub fn distance(kernel: DistanceKernel, matrix: &ExpressionMatrix, i1: usize, i2: usize, transpose: bool) -> f64 {
    let n = matrix.n_features(transpose);
    let (a_vals, a_mask) = extract_row(matrix, i1, transpose, n);
    let (b_vals, b_mask) = extract_row(matrix, i2, transpose, n);
    let weight: Vec<f64> = (0..n).map(|k| matrix.weight(k)).collect();
    eval(kernel, n, &weight, &a_vals, &a_mask, &b_vals, &b_mask)
}

/// Distance between object `obj` of `matrix` and cluster `cluster`'s
/// centroid in `centroid`.
pub fn distance_to_centroid(
    kernel: DistanceKernel,
    matrix: &ExpressionMatrix,
    obj: usize,
    transpose: bool,
    centroid: &CentroidBlock,
    cluster: usize,
) -> f64 {
    let n = matrix.n_features(transpose);
    let (a_vals, a_mask) = extract_row(matrix, obj, transpose, n);
    let (b_vals, b_mask) = centroid.row(cluster);
    let weight: Vec<f64> = (0..n).map(|k| matrix.weight(k)).collect();
    eval(kernel, n, &weight, &a_vals, &a_mask, b_vals, b_mask)
}

/// Distance between two centroids, sharing `weight` (the matrix's feature
/// weights under the same orientation the centroids were built with).
pub fn distance_between_centroids(
    kernel: DistanceKernel,
    weight: &[f64],
    a: &CentroidBlock,
    ca: usize,
    b: &CentroidBlock,
    cb: usize,
) -> f64 {
    let (a_vals, a_mask) = a.row(ca);
    let (b_vals, b_mask) = b.row(cb);
    eval(kernel, weight.len(), weight, a_vals, a_mask, b_vals, b_mask)
}

fn extract_row(matrix: &ExpressionMatrix, obj: usize, transpose: bool, n: usize) -> (Vec<f64>, Vec<bool>) {
    let mut vals = Vec::with_capacity(n);
    let mut mask = Vec::with_capacity(n);
    for k in 0..n {
        vals.push(matrix.value(obj, k, transpose));
        mask.push(matrix.present(obj, k, transpose));
    }
    (vals, mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tag_defaults_to_euclidean() {
        assert_eq!(DistanceKernel::from_tag('?'), DistanceKernel::Euclidean);
        assert_eq!(DistanceKernel::from_tag('e'), DistanceKernel::Euclidean);
    }

    #[test]
    fn self_distance_is_zero_for_every_kernel() {
        let m = ExpressionMatrix::new(
            vec![vec![1.0, 2.0, 3.0, 4.0]],
            vec![vec![true, true, true, true]],
            vec![1.0; 4],
        );
        for tag in ['e', 'h', 'c', 'a', 'u', 'x', 's', 'k'] {
            let kernel = DistanceKernel::from_tag(tag);
            let d = distance(kernel, &m, 0, 0, false);
            assert!(d.abs() < 1e-9, "kernel {tag} self-distance was {d}");
        }
    }
}
