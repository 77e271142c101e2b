//! Linkage rules: how the distance from a newly merged cluster to every
//! other surviving cluster is derived from the two children's distances to
//! that cluster. Centroid linkage does not fit this shape (it recomputes
//! distances from recombined centroids instead) and is handled separately
//! in `tree.rs`.

/// The four linkage variants, selected by tag character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// `s` — nearest-neighbour: `min(d_i, d_j)`.
    Single,
    /// `m` — farthest-neighbour: `max(d_i, d_j)`.
    Complete,
    /// `a` — size-weighted mean: `(n_i*d_i + n_j*d_j) / (n_i + n_j)`.
    Average,
    /// `c` — centroid linkage: distances are recomputed from recombined
    /// centroids rather than updated from the children's distances.
    Centroid,
}

impl Linkage {
    /// Maps a tag character to a linkage rule, defaulting to [`Linkage::Single`]
    /// for any character outside `s m a c`.
    pub fn from_tag(tag: char) -> Self {
        match tag {
            'm' => Linkage::Complete,
            'a' => Linkage::Average,
            'c' => Linkage::Centroid,
            _ => Linkage::Single,
        }
    }

    pub fn tag(self) -> char {
        match self {
            Linkage::Single => 's',
            Linkage::Complete => 'm',
            Linkage::Average => 'a',
            Linkage::Centroid => 'c',
        }
    }

    /// Applies the update rule. Must not be called for [`Linkage::Centroid`],
    /// which has no row-update form.
    pub(crate) fn merge(self, d_i: f64, d_j: f64, n_i: usize, n_j: usize) -> f64 {
        match self {
            Linkage::Single => d_i.min(d_j),
            Linkage::Complete => d_i.max(d_j),
            Linkage::Average => (n_i as f64 * d_i + n_j as f64 * d_j) / (n_i + n_j) as f64,
            Linkage::Centroid => unreachable!("centroid linkage recomputes distances from centroids"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_link_takes_the_minimum() {
        assert_eq!(Linkage::Single.merge(2.0, 5.0, 1, 1), 2.0);
    }

    #[test]
    fn complete_link_takes_the_maximum() {
        assert_eq!(Linkage::Complete.merge(2.0, 5.0, 1, 1), 5.0);
    }

    #[test]
    fn average_link_weights_by_cluster_size() {
        let d = Linkage::Average.merge(1.0, 3.0, 1, 3);
        assert!((d - 2.5).abs() < 1e-9);
    }
}
