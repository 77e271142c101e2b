//! Clustering routines for gene-expression-style data matrices: masked,
//! weighted distance kernels, k-means/k-medians partitioning, hierarchical
//! agglomerative clustering under four linkage rules, a self-organising
//! map trainer, and an inter-cluster distance query.
//!
//! See [`hierarchical`] for a worked example of building a dendrogram, and
//! [`kpartition::kcluster`] for the k-partition entry point.

pub mod centroid;
pub mod errors;
pub mod hierarchical;
pub mod interdistance;
pub mod kernels;
pub mod kpartition;
pub mod matrix;
pub mod numeric;
pub mod rng;
pub mod som;

pub use centroid::CentroidMethod;
pub use errors::ClusteringError;
pub use hierarchical::{tree_cluster, Linkage, Node};
pub use interdistance::{cluster_distance, InterClusterMethod};
pub use kernels::DistanceKernel;
pub use kpartition::{kcluster, KClusterOutcome};
pub use matrix::{CentroidBlock, ExpressionMatrix};
pub use rng::{RandomSource, SmallRngSource};
pub use som::{som_cluster, SomGrid, SomOutcome};
