//! Agglomerative hierarchical clustering.
//!
//! Builds a dendrogram as a flat sequence of merges: the closest pair of
//! active clusters is merged repeatedly until one remains, under one of
//! four linkage rules (single, complete, average, centroid). For example,
//! clustering four points at the corners of a unit square under single
//! linkage:
//!
//! ```
//! use expr_cluster::matrix::ExpressionMatrix;
//! use expr_cluster::kernels::DistanceKernel;
//! use expr_cluster::hierarchical::{tree_cluster, Linkage};
//!
//! let matrix = ExpressionMatrix::new(
//!     vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
//!     vec![vec![true, true]; 4],
//!     vec![1.0, 1.0],
//! );
//! let merges = tree_cluster(&matrix, DistanceKernel::Euclidean, Linkage::Single, false, false, None).unwrap();
//! assert_eq!(merges.len(), 3);
//! ```

mod distance_matrix;
mod linkage;
mod tree;

pub use distance_matrix::JaggedDistanceMatrix;
pub use linkage::Linkage;
pub use tree::{tree_cluster, Merge, Node};
