use thiserror::Error;

/// Errors that may appear while clustering an expression matrix.
#[derive(Debug, Error)]
pub enum ClusteringError {
    #[error("cannot partition {n_objects} objects into {k_clusters} clusters: fewer objects than clusters")]
    /// `kcluster` was asked for more clusters than there are objects to place in them.
    TooFewObjectsForClusters { n_objects: usize, k_clusters: usize },

    #[error("at least two objects are required for this operation, got {n_objects}")]
    /// Hierarchical clustering or SOM training was asked to run on fewer than two objects.
    TooFewObjects { n_objects: usize },

    #[error("index {index} is out of range for {bound} objects")]
    /// An index passed into a matrix accessor fell outside the valid range.
    IndexOutOfRange { index: usize, bound: usize },
}
