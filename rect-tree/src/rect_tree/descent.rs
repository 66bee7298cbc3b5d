//! Child selection while descending to the leaf that receives a point.

use super::tree_impl::RectangleTree;
use super::tree_types::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Descent {
    /// Least volume enlargement, ties to the smaller volume.
    RTree,
    /// Least overlap enlargement when the children are leaves, otherwise the
    /// R-tree rule.
    RStar,
}

impl Descent {
    /// Index into `node`'s children of the subtree that should receive
    /// `point`. `node` must be internal with at least one child.
    pub(crate) fn choose_child(self, tree: &RectangleTree, node: NodeId, point: &[f64]) -> usize {
        let children = tree.node(node).children();
        let leaf_children = children
            .first()
            .is_some_and(|&c| tree.node(c).is_leaf());

        let mut best_idx = 0;
        let mut best_key = (f64::INFINITY, f64::INFINITY, f64::INFINITY);
        for (i, &child) in children.iter().enumerate() {
            let bound = tree.node(child).bound();
            let enlargement = bound.enlargement_for_point(point);
            let volume = bound.volume();
            let key = match self {
                Descent::RStar if leaf_children => {
                    let grown = bound.union_point(point);
                    let mut overlap = 0.0;
                    for (j, &other) in children.iter().enumerate() {
                        if i != j {
                            let other = tree.node(other).bound();
                            overlap += grown.overlap_volume(other) - bound.overlap_volume(other);
                        }
                    }
                    (overlap, enlargement, volume)
                }
                _ => (enlargement, volume, 0.0),
            };

            if key < best_key {
                best_key = key;
                best_idx = i;
            }
        }
        best_idx
    }
}
