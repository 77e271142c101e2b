//! The `c`/`a` (centred Pearson) and `u`/`x` (uncentred) kernels.

use super::usable_triples;

/// Weighted Pearson correlation distance: `1 - r` (or `1 - |r|` when `absolute`).
/// Returns 1 if either usable-weighted variance is non-positive (including
/// the case of zero usable elements, where both variances are 0).
pub(super) fn pearson(weight: &[f64], a_vals: &[f64], a_mask: &[bool], b_vals: &[f64], b_mask: &[bool], absolute: bool) -> f64 {
    let triples = usable_triples(weight, a_vals, a_mask, b_vals, b_mask);
    let w_sum: f64 = triples.iter().map(|&(_, _, w)| w).sum();
    if w_sum <= 0.0 {
        return 1.0;
    }
    let mean_a: f64 = triples.iter().map(|&(a, _, w)| w * a).sum::<f64>() / w_sum;
    let mean_b: f64 = triples.iter().map(|&(_, b, w)| w * b).sum::<f64>() / w_sum;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for &(a, b, w) in &triples {
        let da = a - mean_a;
        let db = b - mean_b;
        cov += w * da * db;
        var_a += w * da * da;
        var_b += w * db * db;
    }
    if var_a <= 0.0 || var_b <= 0.0 {
        return 1.0;
    }
    let r = cov / (var_a * var_b).sqrt();
    if absolute {
        1.0 - r.abs()
    } else {
        1.0 - r
    }
}

/// Weighted uncentred correlation distance: `1 - r` (or `1 - |r|`) where
/// `r = sum(w*a*b) / sqrt(sum(w*a^2) * sum(w*b^2))`. Returns 1 if either
/// sum of squares is 0, and 0 if there are no usable elements.
pub(super) fn uncentred(weight: &[f64], a_vals: &[f64], a_mask: &[bool], b_vals: &[f64], b_mask: &[bool], absolute: bool) -> f64 {
    let triples = usable_triples(weight, a_vals, a_mask, b_vals, b_mask);
    if triples.is_empty() {
        return 0.0;
    }
    let mut cross = 0.0;
    let mut sq_a = 0.0;
    let mut sq_b = 0.0;
    for &(a, b, w) in &triples {
        cross += w * a * b;
        sq_a += w * a * a;
        sq_b += w * b * b;
    }
    if sq_a <= 0.0 || sq_b <= 0.0 {
        return 1.0;
    }
    let r = cross / (sq_a * sq_b).sqrt();
    if absolute {
        1.0 - r.abs()
    } else {
        1.0 - r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_negative_correlation_distance_is_two() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [5.0, 4.0, 3.0, 2.0, 1.0];
        let mask = [true; 5];
        let weight = [1.0; 5];
        let d = pearson(&weight, &a, &mask, &b, &mask, false);
        assert!((d - 2.0).abs() < 1e-9);
    }

    #[test]
    fn proportional_vectors_have_zero_uncentred_distance() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 4.0, 6.0];
        let mask = [true; 3];
        let weight = [1.0; 3];
        let d = uncentred(&weight, &a, &mask, &b, &mask, false);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn no_usable_elements_uncentred_is_zero() {
        let a = [1.0];
        let b = [2.0];
        let mask = [false];
        let weight = [1.0];
        assert_eq!(uncentred(&weight, &a, &mask, &b, &mask, false), 0.0);
    }
}
