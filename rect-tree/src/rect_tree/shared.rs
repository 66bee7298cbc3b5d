//! Shared, lock-protected rectangle tree.

use parking_lot::RwLock;
use std::sync::Arc;

use super::config::TreeConfig;
use super::integrity::IntegrityReport;
use super::tree_impl::RectangleTree;
use super::tree_types::{PointId, SplitStats, TreeResult};
use crate::bound::BoundingRectangle;
use crate::spatial_index::SpatialIndex;

/// A [`RectangleTree`] behind a reader-writer lock.
///
/// Clones share the same tree. Inserts and removals restructure the tree and
/// take the write lock; queries take the read lock.
#[derive(Debug, Clone)]
pub struct SharedRectangleTree {
    inner: Arc<RwLock<RectangleTree>>,
}

impl SharedRectangleTree {
    pub fn new(config: TreeConfig) -> TreeResult<Self> {
        Ok(Self::from_tree(RectangleTree::new(config)?))
    }

    pub fn from_tree(tree: RectangleTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Runs `f` with shared access to the tree.
    pub fn read<R>(&self, f: impl FnOnce(&RectangleTree) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Runs `f` with exclusive access to the tree.
    pub fn write<R>(&self, f: impl FnOnce(&mut RectangleTree) -> R) -> R {
        f(&mut *self.inner.write())
    }

    pub fn stats(&self) -> SplitStats {
        self.inner.read().stats().clone()
    }

    pub fn check_integrity(&self) -> IntegrityReport {
        self.inner.read().check_integrity()
    }

    /// Coordinates of a live point.
    pub fn point(&self, id: PointId) -> Option<Vec<f64>> {
        self.inner.read().point(id).map(<[f64]>::to_vec)
    }
}

impl SpatialIndex for SharedRectangleTree {
    fn insert(&self, point: &[f64]) -> TreeResult<PointId> {
        self.inner.write().insert(point)
    }

    fn remove(&self, id: PointId) -> TreeResult<bool> {
        self.inner.write().remove(id)
    }

    fn contains(&self, id: PointId) -> bool {
        self.inner.read().contains(id)
    }

    fn find_within(&self, query: &BoundingRectangle) -> TreeResult<Vec<PointId>> {
        self.inner.read().find_within(query)
    }

    fn size(&self) -> u64 {
        self.inner.read().len() as u64
    }

    fn clear(&self) -> TreeResult<()> {
        self.inner.write().clear();
        Ok(())
    }
}
