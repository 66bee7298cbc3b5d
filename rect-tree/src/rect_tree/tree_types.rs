//! Core types and data structures for the rectangle tree.
//!
//! This module defines the fundamental types used throughout the tree:
//! - Error types and result types
//! - Node identity and the arena node itself
//! - Per-node split history (X-tree)
//! - Split statistics and the per-level reinsertion flags

use crate::bound::BoundingRectangle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur in rectangle tree operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Invalid point: {0}")]
    InvalidPoint(String),

    #[error("Point {0} not found")]
    PointNotFound(PointId),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result type for rectangle tree operations
pub type TreeResult<T> = Result<T, TreeError>;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a point stored in the tree.
///
/// Ids are handed out by [`RectangleTree::insert`](super::RectangleTree::insert)
/// and never reused, so a removed id stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub(crate) usize);

impl PointId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

// ============================================================================
// Split History
// ============================================================================

/// Axes a node has been split along since the last split on a new axis.
///
/// This is a plain value: a split clones the history of the node being split
/// into both replacement nodes and marks the winning axis in each copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitHistory {
    history: Vec<bool>,
    last_dimension: usize,
}

impl SplitHistory {
    pub fn new(dimension: usize) -> Self {
        Self {
            history: vec![false; dimension],
            last_dimension: 0,
        }
    }

    /// Whether `axis` has been used as a split axis.
    pub fn is_used(&self, axis: usize) -> bool {
        self.history.get(axis).copied().unwrap_or(false)
    }

    pub fn last_dimension(&self) -> usize {
        self.last_dimension
    }

    /// Returns a copy with `axis` marked as the most recent split axis.
    pub fn with_split(&self, axis: usize) -> Self {
        let mut next = self.clone();
        if let Some(bit) = next.history.get_mut(axis) {
            *bit = true;
        }
        next.last_dimension = axis;
        next
    }
}

// ============================================================================
// Node
// ============================================================================

/// A vertex of the rectangle tree.
///
/// Nodes live in the tree arena and are addressed by [`NodeId`]. A leaf holds
/// point ids, an internal node holds child ids. The `parent` field is a
/// non-owning back-reference maintained by every structural change.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) leaf: bool,
    pub(crate) points: Vec<PointId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) bound: BoundingRectangle,
    pub(crate) parent: Option<NodeId>,
    /// Capacity for children; doubled when an X-tree node becomes a supernode.
    pub(crate) max_num_children: usize,
    pub(crate) split_history: SplitHistory,
    pub(crate) retired: bool,
}

impl Node {
    pub(crate) fn new(
        leaf: bool,
        dimension: usize,
        parent: Option<NodeId>,
        max_num_children: usize,
    ) -> Self {
        Self {
            leaf,
            points: Vec::new(),
            children: Vec::new(),
            bound: BoundingRectangle::new(dimension),
            parent,
            max_num_children,
            split_history: SplitHistory::new(dimension),
            retired: false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Number of points held directly (leaves only).
    pub fn count(&self) -> usize {
        self.points.len()
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Number of entries, points for a leaf and children otherwise.
    pub fn len(&self) -> usize {
        if self.leaf {
            self.points.len()
        } else {
            self.children.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points(&self) -> &[PointId] {
        &self.points
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn bound(&self) -> &BoundingRectangle {
        &self.bound
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn max_num_children(&self) -> usize {
        self.max_num_children
    }

    pub fn split_history(&self) -> &SplitHistory {
        &self.split_history
    }

    /// Whether this node has been soft-deleted.
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    pub(crate) fn insert_point(&mut self, id: PointId, point: &[f64]) {
        self.bound.expand_point(point);
        self.points.push(id);
    }

    pub(crate) fn insert_child(&mut self, id: NodeId, bound: &BoundingRectangle) {
        self.bound.expand(bound);
        self.children.push(id);
    }
}

// ============================================================================
// Reinsertion flags
// ============================================================================

/// One flag per tree level, true while forced reinsertion is still allowed at
/// that level during the current insertion cascade.
///
/// Levels count from the leaves (leaf = 0) so the flags stay put when the
/// root grows in the middle of a cascade.
#[derive(Debug, Clone)]
pub(crate) struct Relevels {
    flags: Vec<bool>,
}

impl Relevels {
    pub(crate) fn new(height: usize) -> Self {
        Self {
            flags: vec![true; height + 1],
        }
    }

    /// Consumes the flag for `level`, returning whether it was still set.
    pub(crate) fn take(&mut self, level: usize) -> bool {
        if level >= self.flags.len() {
            self.flags.resize(level + 1, true);
        }
        std::mem::replace(&mut self.flags[level], false)
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Counters describing what the split engine has done so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SplitStats {
    pub leaf_splits: u64,
    pub non_leaf_splits: u64,
    pub root_promotions: u64,
    pub forced_reinsertions: u64,
    pub reinserted_points: u64,
    pub supernode_growths: u64,
    pub root_absorptions: u64,
    pub min_overlap_splits: u64,
    pub degenerate_splits: u64,
    /// Largest overlap ratio of a non-leaf split accepted under the X-tree policy
    pub max_accepted_overlap_ratio: f64,
}
