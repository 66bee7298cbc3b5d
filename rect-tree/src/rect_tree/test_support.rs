//! Hand-built trees for unit tests that drive the split engine directly.

use super::config::TreeConfig;
use super::split::SplitPolicy;
use super::tree_impl::RectangleTree;
use super::tree_types::{NodeId, PointId};

/// An X-tree with leaves of 2..=4 points and 2..=6 children whose root is an
/// empty directory, ready to have subtrees attached by hand.
pub(crate) fn x_tree_directory(dimension: usize) -> RectangleTree {
    let config = TreeConfig::builder()
        .dimension(dimension)
        .leaf_size(2, 4)
        .num_children(2, 6)
        .split_policy(SplitPolicy::XTree)
        .build()
        .unwrap();
    let mut tree = RectangleTree::new(config).unwrap();
    let root = tree.root();
    tree.arena[root.0].leaf = false;
    tree
}

/// Adds a new internal node under `parent`.
pub(crate) fn add_directory(tree: &mut RectangleTree, parent: NodeId) -> NodeId {
    let max = tree.config().max_num_children();
    tree.allocate_node(false, Some(parent), max)
}

/// Adds a leaf holding `points` under `parent`, registering each point as
/// live.
pub(crate) fn add_leaf(tree: &mut RectangleTree, parent: NodeId, points: &[&[f64]]) -> NodeId {
    let max = tree.config().max_num_children();
    let leaf = tree.allocate_node(true, Some(parent), max);
    for p in points {
        let id = PointId(tree.dataset.len());
        tree.dataset.push(p.to_vec());
        tree.live.push(true);
        tree.size += 1;
        tree.arena[leaf.0].insert_point(id, p);
    }
    attach(tree, parent, leaf);
    leaf
}

/// Links `child` into `parent`, growing the parent's bound.
pub(crate) fn attach(tree: &mut RectangleTree, parent: NodeId, child: NodeId) {
    let bound = tree.arena[child.0].bound.clone();
    tree.arena[parent.0].insert_child(child, &bound);
}
