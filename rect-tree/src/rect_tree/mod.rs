//! In-memory rectangle tree with pluggable node split strategies.
//!
//! The tree keeps its nodes in an arena and resolves every overflow through
//! one propagator; the split policy chosen in [`TreeConfig`] only decides how
//! a node is divided (or, for the R*-tree and X-tree, whether it is split at
//! all).

pub mod config;
pub mod integrity;
pub mod shared;
pub mod split;
pub mod tree_constants;
pub mod tree_types;
mod descent;
mod propagate;
mod reinsert;
mod tree_impl;
#[cfg(test)]
mod test_support;

pub use config::{TreeConfig, TreeConfigBuilder};
pub use integrity::IntegrityReport;
pub use shared::SharedRectangleTree;
pub use split::SplitPolicy;
pub use tree_impl::RectangleTree;
pub use tree_types::{
    Node, NodeId, PointId, SplitHistory, SplitStats, TreeError, TreeResult,
};
