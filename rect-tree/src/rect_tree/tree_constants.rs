//! Constants for the rectangle tree.

/// Default dimensionality of the indexed points
pub const DEFAULT_DIMENSION: usize = 2;

/// Maximum number of points per leaf node
pub const DEFAULT_MAX_LEAF_SIZE: usize = 20;

/// Minimum number of points per non-root leaf node
pub const DEFAULT_MIN_LEAF_SIZE: usize = 8;

/// Maximum children per internal node
pub const DEFAULT_MAX_NUM_CHILDREN: usize = 5;

/// Minimum children per non-root internal node
pub const DEFAULT_MIN_NUM_CHILDREN: usize = 2;

/// Fraction of a leaf's capacity removed and reinserted by the R*-tree before
/// it falls back to splitting (30% per the R*-tree paper)
pub const REINSERT_FRACTION: f64 = 0.3;

/// Largest overlap ratio an X-tree split may have before the node becomes a
/// supernode
pub const MAX_OVERLAP: f64 = 0.2;
