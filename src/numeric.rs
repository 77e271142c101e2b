//! Small numeric primitives shared by the distance kernels and the
//! clustering engines: mean, median, an index-returning sort, average-tie
//! ranking, and a one-sided Jacobi singular value decomposition.

/// Arithmetic mean of a slice. Returns 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of `values`, selected in-place via quickselect (no full sort).
/// Returns 0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut buf = values.to_vec();
    let n = buf.len();
    let mid = n / 2;
    if n % 2 == 1 {
        *quickselect(&mut buf, mid)
    } else {
        let hi = *quickselect(&mut buf, mid);
        let lo = *quickselect(&mut buf[..mid], mid - 1);
        (lo + hi) / 2.0
    }
}

/// Returns a mutable reference to the element that would occupy position
/// `k` (0-based) if `buf` were fully sorted, partially reordering `buf`.
fn quickselect(buf: &mut [f64], k: usize) -> &mut f64 {
    let mut lo = 0usize;
    let mut hi = buf.len() - 1;
    while lo < hi {
        let pivot = buf[(lo + hi) / 2];
        let mut i = lo;
        let mut j = hi;
        while i <= j {
            while buf[i] < pivot {
                i += 1;
            }
            while buf[j] > pivot {
                j -= 1;
            }
            if i <= j {
                buf.swap(i, j);
                i += 1;
                if j == 0 {
                    break;
                }
                j -= 1;
            }
        }
        if k <= j {
            hi = j;
        } else if k >= i {
            lo = i;
        } else {
            break;
        }
    }
    &mut buf[k]
}

/// Returns the permutation of `0..values.len()` that sorts `values`
/// ascending; applying it (`index.iter().map(|&i| values[i])`) yields a
/// monotone sequence. Stable with respect to the input order for equal
/// keys.
pub fn sort_index(values: &[f64]) -> Vec<usize> {
    let mut index: Vec<usize> = (0..values.len()).collect();
    index.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap());
    index
}

/// Average-tie ranks of `values`: elements with equal value receive the
/// mean of the positions they would jointly occupy in sorted order.
pub fn rank(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let order = sort_index(values);
    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let average_rank = (i + j) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = average_rank;
        }
        i = j + 1;
    }
    ranks
}

/// In-place one-sided Jacobi SVD of the `m x n` matrix `a` (`m >= n`,
/// stored row-major). On return `a` holds `U` (with the same shape as the
/// input), `s` holds the `n` singular values, and `v` (an `n x n`
/// matrix, row-major) holds `V`, such that `a_original = U * diag(s) * V^T`.
pub fn svd(a: &mut [Vec<f64>], s: &mut [f64], v: &mut [Vec<f64>]) {
    let m = a.len();
    if m == 0 {
        return;
    }
    let n = a[0].len();
    for row in v.iter_mut() {
        for x in row.iter_mut() {
            *x = 0.0;
        }
    }
    for i in 0..n {
        v[i][i] = 1.0;
    }

    const MAX_SWEEPS: usize = 60;
    let eps = 1e-12;
    for _ in 0..MAX_SWEEPS {
        let mut off_diagonal = 0.0f64;
        for p in 0..n {
            for q in (p + 1)..n {
                let mut alpha = 0.0f64;
                let mut beta = 0.0f64;
                let mut gamma = 0.0f64;
                for row in a.iter() {
                    alpha += row[p] * row[p];
                    beta += row[q] * row[q];
                    gamma += row[p] * row[q];
                }
                off_diagonal += gamma.abs();
                if gamma.abs() <= eps * (alpha * beta).sqrt() {
                    continue;
                }
                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                let t = if zeta == 0.0 { 1.0 } else { t };
                let c = 1.0 / (1.0 + t * t).sqrt();
                let sn = c * t;

                for row in a.iter_mut() {
                    let ap = row[p];
                    let aq = row[q];
                    row[p] = c * ap - sn * aq;
                    row[q] = sn * ap + c * aq;
                }
                for row in v.iter_mut() {
                    let vp = row[p];
                    let vq = row[q];
                    row[p] = c * vp - sn * vq;
                    row[q] = sn * vp + c * vq;
                }
            }
        }
        if off_diagonal < eps {
            break;
        }
    }

    for j in 0..n {
        let mut norm = 0.0f64;
        for row in a.iter() {
            norm += row[j] * row[j];
        }
        norm = norm.sqrt();
        s[j] = norm;
        if norm > eps {
            for row in a.iter_mut() {
                row[j] /= norm;
            }
        }
    }
}
