//! # Rect Tree - Rectangle Trees with Pluggable Node Splitting
//!
//! This crate provides an in-memory rectangle tree over d-dimensional points
//! together with the node-overflow machinery that keeps it balanced.
//!
//! ## Features
//!
//! - **Three Split Policies**: quadratic R-tree, R*-tree and X-tree
//! - **Forced Reinsertion**: R* leaves shed their outermost points once per
//!   level before splitting
//! - **Supernodes**: X-tree directories that cannot be split without heavy
//!   overlap grow instead
//! - **Stable Root**: the root node keeps its id for the life of the tree
//! - **Integrity Checks**: every structural invariant can be verified on demand
//! - **Thread Safe Wrapper**: [`SharedRectangleTree`] for concurrent use
//!
//! ## Quick Start
//!
//! ```rust
//! use rect_tree::{BoundingRectangle, Range, RectangleTree, SplitPolicy, TreeConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TreeConfig::builder()
//!     .dimension(2)
//!     .leaf_size(2, 4)
//!     .num_children(2, 4)
//!     .split_policy(SplitPolicy::XTree)
//!     .build()?;
//! let mut tree = RectangleTree::new(config)?;
//!
//! for i in 0..100 {
//!     tree.insert(&[i as f64, (i * 7 % 13) as f64])?;
//! }
//!
//! let query = BoundingRectangle::from_ranges(vec![Range::new(0.0, 10.0), Range::new(0.0, 13.0)]);
//! assert_eq!(tree.find_within(&query)?.len(), 11);
//! assert!(tree.check_integrity().is_valid);
//! # Ok(())
//! # }
//! ```

pub mod bound;
pub mod metric;
pub mod rect_tree;
pub mod spatial_index;

pub use bound::{BoundingRectangle, Range};
pub use metric::Metric;
pub use rect_tree::{
    IntegrityReport, Node, NodeId, PointId, RectangleTree, SharedRectangleTree, SplitHistory,
    SplitPolicy, SplitStats, TreeConfig, TreeConfigBuilder, TreeError, TreeResult,
};
pub use spatial_index::SpatialIndex;
