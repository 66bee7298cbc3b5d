//! X-tree split.
//!
//! Leaves split exactly like the R*-tree. Directory nodes try the margin-best
//! R* split first and accept it only if the two halves overlap by less than
//! the configured ratio. Failing that, the best split along the minimum
//! overlap axis (an axis the children's split histories have in common) is
//! tried, and if that overlaps too, the node becomes a supernode.

use super::r_star_split::{leaf_partition, reinsert_decision};
use super::{score_axis, AxisScore, Edge, SplitDecision, SplitKind, SplitStrategy};
use crate::rect_tree::tree_impl::RectangleTree;
use crate::rect_tree::tree_types::{NodeId, Relevels};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct XTreeSplit;

impl SplitStrategy for XTreeSplit {
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
        let config = tree.config();
        let bounds = tree.entry_bounds(node);
        let max_ratio = config.max_overlap_ratio();
        let overlap_axis = min_overlap_axis(tree, node);

        let mut best_margin: Option<AxisScore> = None;
        let mut best_on_overlap_axis: Option<(AxisScore, usize)> = None;
        for edge in [Edge::Low, Edge::High] {
            for axis in 0..config.dimension() {
                let score = score_axis(&bounds, axis, edge, config.min_num_children());
                if score.distributions.is_empty() {
                    continue;
                }
                if axis == overlap_axis {
                    let index = score.best();
                    let better = match &best_on_overlap_axis {
                        Some((current, i)) => {
                            score.distributions[index].beats(&current.distributions[*i])
                        }
                        None => true,
                    };
                    if better {
                        best_on_overlap_axis = Some((score.clone(), index));
                    }
                }
                if best_margin
                    .as_ref()
                    .map_or(true, |b| score.margin_sum < b.margin_sum)
                {
                    best_margin = Some(score);
                }
            }
        }

        if let Some(score) = best_margin {
            let index = score.best();
            let ratio = score.distributions[index].overlap_ratio();
            if ratio < max_ratio {
                let mut partition = score.partition(index, SplitKind::Margin);
                partition.overlap_ratio = Some(ratio);
                return SplitDecision::Partition(partition);
            }
            log::trace!(
                "Margin split of {} on axis {} overlaps {:.3}, trying axis {}",
                node,
                score.axis,
                ratio,
                overlap_axis
            );
        }

        if let Some((score, index)) = best_on_overlap_axis {
            let ratio = score.distributions[index].overlap_ratio();
            if ratio < max_ratio {
                let mut partition = score.partition(index, SplitKind::MinOverlap);
                partition.overlap_ratio = Some(ratio);
                return SplitDecision::Partition(partition);
            }
        }

        log::debug!("No split of {} stays under overlap ratio {}", node, max_ratio);
        SplitDecision::Supernode
    }

    fn records_history(&self) -> bool {
        true
    }
}

/// The axis every child has already been split along, scanning upward from
/// just past the median of the children's most recent split axes and
/// wrapping around. When no axis is shared by all children, the axis used by
/// the fewest children is taken instead.
pub(crate) fn min_overlap_axis(tree: &RectangleTree, node: NodeId) -> usize {
    let dimension = tree.config().dimension();
    let children = tree.node(node).children();
    if children.is_empty() || dimension == 0 {
        return 0;
    }

    let mut recent: Vec<usize> = children
        .iter()
        .map(|&c| tree.node(c).split_history().last_dimension())
        .collect();
    recent.sort_unstable();
    let median = recent[recent.len() / 2].min(dimension - 1);

    let scan = || (median + 1..dimension).chain(0..=median);
    let used_by = |axis: usize| {
        children
            .iter()
            .filter(|&&c| tree.node(c).split_history().is_used(axis))
            .count()
    };

    if let Some(axis) = scan().find(|&axis| used_by(axis) == children.len()) {
        return axis;
    }
    scan().min_by_key(|&axis| used_by(axis)).unwrap_or(median)
}
