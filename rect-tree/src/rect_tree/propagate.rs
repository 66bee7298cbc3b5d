//! Applies split decisions and cascades overflow toward the root.
//!
//! Propagation is iterative: each applied split returns the parent, which is
//! checked for overflow in turn. An overflowing root is first pushed down
//! into a new child so the root id never changes, then that child is split
//! like any other node.

use std::mem;

use super::split::{Partition, SplitDecision, SplitKind};
use super::tree_impl::RectangleTree;
use super::tree_types::{NodeId, Relevels, TreeError, TreeResult};

impl RectangleTree {
    /// Resolves a leaf holding one point more than `max_leaf_size`.
    pub(crate) fn resolve_leaf_overflow(
        &mut self,
        leaf: NodeId,
        relevels: &mut Relevels,
    ) -> TreeResult<()> {
        let leaf = if leaf == self.root {
            self.promote_root()
        } else {
            leaf
        };

        let strategy = self.config.split_policy().strategy();
        match strategy.split_leaf(self, leaf, relevels) {
            SplitDecision::Reinsert { count } => self.force_reinsert(leaf, count, relevels),
            SplitDecision::Partition(partition) => {
                self.stats.leaf_splits += 1;
                let parent = self.apply_partition(leaf, partition, strategy.records_history())?;
                self.resolve_non_leaf_overflow(parent)
            }
            SplitDecision::Supernode => Err(TreeError::InvariantViolation(format!(
                "leaf {} cannot become a supernode",
                leaf
            ))),
        }
    }

    /// Splits `node` and its ancestors while they hold more children than
    /// their capacity.
    pub(crate) fn resolve_non_leaf_overflow(&mut self, start: NodeId) -> TreeResult<()> {
        let strategy = self.config.split_policy().strategy();
        let mut node = start;
        while self.arena[node.0].children.len() > self.arena[node.0].max_num_children {
            if node == self.root {
                node = self.promote_root();
            }
            match strategy.split_non_leaf(self, node) {
                SplitDecision::Partition(partition) => {
                    self.stats.non_leaf_splits += 1;
                    node = self.apply_partition(node, partition, strategy.records_history())?;
                }
                SplitDecision::Supernode => return self.grow_supernode(node),
                SplitDecision::Reinsert { .. } => {
                    return Err(TreeError::InvariantViolation(format!(
                        "internal node {} cannot be reinserted",
                        node
                    )))
                }
            }
        }
        Ok(())
    }

    /// Moves the root's contents into a new child and returns that child.
    /// The root becomes an internal node with exactly one child.
    pub(crate) fn promote_root(&mut self) -> NodeId {
        let root = self.root;
        let (leaf, max_num_children) = {
            let node = &self.arena[root.0];
            (node.leaf, node.max_num_children)
        };
        let copy = self.allocate_node(leaf, Some(root), max_num_children);

        let root_node = &mut self.arena[root.0];
        let points = mem::take(&mut root_node.points);
        let children = mem::take(&mut root_node.children);
        let bound = root_node.bound.clone();
        let history = root_node.split_history.clone();
        root_node.leaf = false;
        root_node.max_num_children = self.config.max_num_children();
        root_node.children.push(copy);

        for &child in &children {
            self.arena[child.0].parent = Some(copy);
        }
        let copy_node = &mut self.arena[copy.0];
        copy_node.points = points;
        copy_node.children = children;
        copy_node.bound = bound;
        copy_node.split_history = history;

        self.stats.root_promotions += 1;
        log::debug!("Root {} overflowed, contents moved to {}", root, copy);
        copy
    }

    /// Replaces `node` in its parent by two new nodes holding the entries of
    /// `partition`, retires `node` and returns the parent.
    pub(crate) fn apply_partition(
        &mut self,
        node: NodeId,
        partition: Partition,
        record_history: bool,
    ) -> TreeResult<NodeId> {
        let parent = self.arena[node.0].parent.ok_or_else(|| {
            TreeError::InvariantViolation(format!("cannot split parentless node {}", node))
        })?;

        let (leaf, max_num_children, history) = {
            let current = &self.arena[node.0];
            let history = match (record_history, partition.axis) {
                (true, Some(axis)) => current.split_history.with_split(axis),
                _ => current.split_history.clone(),
            };
            (current.leaf, current.max_num_children, history)
        };
        debug_assert!(self.partition_is_valid(node, &partition));

        let points = mem::take(&mut self.arena[node.0].points);
        let children = mem::take(&mut self.arena[node.0].children);
        let first = self.allocate_node(leaf, Some(parent), max_num_children);
        let second = self.allocate_node(leaf, Some(parent), max_num_children);

        for (group, target) in [(&partition.first, first), (&partition.second, second)] {
            for &entry in group {
                if leaf {
                    let id = points[entry];
                    self.arena[target.0].insert_point(id, &self.dataset[id.0]);
                } else {
                    let child = children[entry];
                    let bound = self.arena[child.0].bound.clone();
                    self.arena[target.0].insert_child(child, &bound);
                    self.arena[child.0].parent = Some(target);
                }
            }
            self.arena[target.0].split_history = history.clone();
        }

        let siblings = &mut self.arena[parent.0].children;
        let pos = siblings.iter().position(|&c| c == node).ok_or_else(|| {
            TreeError::InvariantViolation(format!(
                "{} is missing from the children of its parent {}",
                node, parent
            ))
        })?;
        siblings[pos] = first;
        siblings.push(second);
        self.retire_node(node);

        match partition.kind {
            SplitKind::Degenerate => self.stats.degenerate_splits += 1,
            SplitKind::MinOverlap => self.stats.min_overlap_splits += 1,
            SplitKind::Quadratic | SplitKind::Margin => {}
        }
        if let Some(ratio) = partition.overlap_ratio {
            self.stats.max_accepted_overlap_ratio = self.stats.max_accepted_overlap_ratio.max(ratio);
        }
        log::debug!(
            "Split {} into {} ({}) and {} ({}) via {:?}",
            node,
            first,
            partition.first.len(),
            second,
            partition.second.len(),
            partition.kind
        );
        Ok(parent)
    }

    /// Every entry lands in exactly one group and both groups meet the
    /// minimum fill (degenerate splits only need to be non-empty).
    fn partition_is_valid(&self, node: NodeId, partition: &Partition) -> bool {
        let current = &self.arena[node.0];
        let count = current.len();
        let min = match partition.kind {
            SplitKind::Degenerate => 1,
            _ if current.leaf => self.config.min_leaf_size(),
            _ => self.config.min_num_children(),
        };
        let mut seen = vec![false; count];
        for &entry in partition.first.iter().chain(&partition.second) {
            if entry >= count || mem::replace(&mut seen[entry], true) {
                return false;
            }
        }
        seen.iter().all(|&s| s) && partition.first.len() >= min && partition.second.len() >= min
    }

    /// Turns an unsplittable X-tree directory node into a supernode.
    ///
    /// A node that is the root's only child is merged into the root instead,
    /// so the tree does not grow a chain of single-child levels.
    pub(crate) fn grow_supernode(&mut self, node: NodeId) -> TreeResult<()> {
        let parent = self.arena[node.0].parent.ok_or_else(|| {
            TreeError::InvariantViolation(format!("supernode {} has no parent", node))
        })?;

        if parent == self.root && self.arena[parent.0].children.len() == 1 {
            let children = mem::take(&mut self.arena[node.0].children);
            let history = self.arena[node.0].split_history.clone();
            self.retire_node(node);

            let root = &mut self.arena[parent.0];
            root.max_num_children *= 2;
            if root.max_num_children < children.len() {
                log::warn!(
                    "Root capacity {} is below {} absorbed children, doubling further",
                    root.max_num_children,
                    children.len()
                );
                while root.max_num_children < children.len() {
                    root.max_num_children *= 2;
                }
            }
            let mut absorbed = Vec::with_capacity(root.max_num_children + 1);
            absorbed.extend_from_slice(&children);
            root.children = absorbed;
            root.split_history = history;
            for &child in &children {
                self.arena[child.0].parent = Some(parent);
            }
            self.recompute_bound(parent);

            self.stats.root_absorptions += 1;
            self.stats.supernode_growths += 1;
            log::debug!(
                "Root {} absorbed {} children, capacity now {}",
                parent,
                children.len(),
                self.arena[parent.0].max_num_children
            );
            return Ok(());
        }

        let current = &mut self.arena[node.0];
        current.max_num_children *= 2;
        let mut grown = Vec::with_capacity(current.max_num_children + 1);
        grown.append(&mut current.children);
        current.children = grown;

        self.stats.supernode_growths += 1;
        log::debug!(
            "{} became a supernode with capacity {}",
            node,
            self.arena[node.0].max_num_children
        );
        Ok(())
    }
}
