//! R*-tree split: margin-driven axis choice and forced reinsertion.

use super::{choose_margin_axis, halve, Edge, Partition, SplitDecision, SplitKind, SplitStrategy};
use crate::rect_tree::tree_impl::RectangleTree;
use crate::rect_tree::tree_types::{NodeId, Relevels};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RStarSplit;

impl SplitStrategy for RStarSplit {
    fn split_leaf(
        &self,
        tree: &RectangleTree,
        leaf: NodeId,
        relevels: &mut Relevels,
    ) -> SplitDecision {
        if let Some(decision) = reinsert_decision(tree, leaf, relevels) {
            return decision;
        }
        SplitDecision::Partition(leaf_partition(tree, leaf))
    }

    fn split_non_leaf(&self, tree: &RectangleTree, node: NodeId) -> SplitDecision {
        // Internal nodes are never reinserted, only split.
        let bounds = tree.entry_bounds(node);
        let config = tree.config();
        match choose_margin_axis(
            &bounds,
            config.dimension(),
            &[Edge::Low, Edge::High],
            config.min_num_children(),
        ) {
            Some(score) => {
                log::trace!(
                    "Splitting {} on axis {} by {:?} edge",
                    node,
                    score.axis,
                    score.edge
                );
                SplitDecision::Partition(score.partition(score.best(), SplitKind::Margin))
            }
            None => SplitDecision::Partition(halve(bounds.len())),
        }
    }
}

/// Forced reinsertion for an overflowing leaf, at most once per level per
/// top-level insertion.
pub(crate) fn reinsert_decision(
    tree: &RectangleTree,
    leaf: NodeId,
    relevels: &mut Relevels,
) -> Option<SplitDecision> {
    let level = tree.level_of(leaf);
    if !relevels.take(level) {
        return None;
    }
    match tree.config().reinsert_count() {
        0 => None,
        count => Some(SplitDecision::Reinsert { count }),
    }
}

/// Margin-optimal split of a leaf's points. Leaf entries are points, so only
/// the low edge needs sorting.
pub(crate) fn leaf_partition(tree: &RectangleTree, leaf: NodeId) -> Partition {
    let bounds = tree.entry_bounds(leaf);
    let config = tree.config();
    match choose_margin_axis(&bounds, config.dimension(), &[Edge::Low], config.min_leaf_size()) {
        Some(score) => score.partition(score.best(), SplitKind::Margin),
        None => halve(bounds.len()),
    }
}
