//! Forced reinsertion of the points farthest from a leaf's center.

use std::cmp::Ordering;

use super::tree_impl::RectangleTree;
use super::tree_types::{NodeId, PointId, Relevels, TreeError, TreeResult};

impl RectangleTree {
    /// Removes the `count` points of `leaf` farthest from its center and
    /// inserts them again from the root, closest first.
    ///
    /// The caller has already consumed the reinsertion flag of the leaf's
    /// level, so an overflow caused by the reinserted points splits instead
    /// of recursing.
    pub(crate) fn force_reinsert(
        &mut self,
        leaf: NodeId,
        count: usize,
        relevels: &mut Relevels,
    ) -> TreeResult<()> {
        let metric = self.config.metric();
        let center = self.arena[leaf.0].bound.center();
        let mut ranked: Vec<(f64, PointId)> = self.arena[leaf.0]
            .points
            .iter()
            .map(|&id| (metric.evaluate(&center, self.coords(id)), id))
            .collect();
        // Farthest first; the stable sort keeps insertion order among ties
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        let removed: Vec<PointId> = ranked.into_iter().take(count).map(|(_, id)| id).collect();

        for &id in &removed {
            if !self.delete_point(id, relevels)? {
                return Err(TreeError::PointNotFound(id));
            }
        }
        for &id in removed.iter().rev() {
            self.insert_point_with(id, relevels)?;
        }

        self.stats.forced_reinsertions += 1;
        self.stats.reinserted_points += removed.len() as u64;
        log::debug!("Reinserted {} points from {}", removed.len(), leaf);
        Ok(())
    }
}
