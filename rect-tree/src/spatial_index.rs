//! SpatialIndex trait definition for point indexing.

use crate::bound::BoundingRectangle;
use crate::rect_tree::{PointId, TreeResult};

/// A thread-safe point index.
///
/// Every method takes `&self`; implementations synchronize internally so an
/// index can be shared between threads behind an `Arc`.
pub trait SpatialIndex: Send + Sync {
    /// Adds a point and returns its id.
    fn insert(&self, point: &[f64]) -> TreeResult<PointId>;

    /// Removes a point from the index.
    fn remove(&self, id: PointId) -> TreeResult<bool>;

    /// Whether the id refers to a live point.
    fn contains(&self, id: PointId) -> bool;

    /// Finds the points inside the query rectangle.
    fn find_within(&self, query: &BoundingRectangle) -> TreeResult<Vec<PointId>>;

    /// Gets the number of live points.
    fn size(&self) -> u64;

    /// Clears all points from the index.
    fn clear(&self) -> TreeResult<()>;
}
