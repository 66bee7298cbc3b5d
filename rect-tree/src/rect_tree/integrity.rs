//! Structural integrity checks.

use std::collections::HashSet;

use super::split::SplitPolicy;
use super::tree_impl::RectangleTree;
use super::tree_types::{NodeId, PointId};
use crate::bound::BoundingRectangle;

/// Result of integrity check operation
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    /// Nodes reachable from the root
    pub nodes_checked: u64,
    /// Points found in reachable leaves
    pub points_reachable: u64,
    /// Nodes holding fewer entries than the configured minimum
    pub underfull_nodes: Vec<NodeId>,
    /// Nodes holding more entries than their capacity
    pub overfull_nodes: Vec<NodeId>,
    /// Summary of findings
    pub is_valid: bool,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            points_reachable: 0,
            underfull_nodes: Vec::new(),
            overfull_nodes: Vec::new(),
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, msg: String) {
        self.is_valid = false;
        self.errors.push(msg);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

impl RectangleTree {
    /// Walks the whole tree and reports every broken structural property:
    /// fanout bounds, bound tightness, parent links, leaf depth, and that each
    /// live point is stored exactly once.
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::new();
        let config = &self.config;
        let root = self.root;

        if self.arena[root.0].parent.is_some() {
            report.fail(format!("root {} has a parent", root));
        }

        let mut seen_points: HashSet<PointId> = HashSet::new();
        let mut seen_nodes: HashSet<NodeId> = HashSet::new();
        let mut leaf_depth: Option<usize> = None;
        let mut stack = vec![(root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            report.nodes_checked += 1;
            if !seen_nodes.insert(id) {
                report.fail(format!("{} is reachable more than once", id));
                continue;
            }
            let node = &self.arena[id.0];
            if node.retired {
                report.fail(format!("retired node {} is reachable", id));
            }

            let is_root = id == root;
            let (min, max) = if node.leaf {
                (config.min_leaf_size(), config.max_leaf_size())
            } else {
                (config.min_num_children(), node.max_num_children)
            };
            let len = node.len();
            if len > max {
                report.overfull_nodes.push(id);
                report.fail(format!("{} holds {} entries, capacity {}", id, len, max));
            }
            if !is_root && len < min {
                report.underfull_nodes.push(id);
                report.fail(format!("{} holds {} entries, minimum {}", id, len, min));
            }
            if is_root && !node.leaf && node.children.is_empty() {
                report.fail(format!("internal root {} has no children", id));
            }
            if config.split_policy() != SplitPolicy::XTree
                && !node.leaf
                && node.max_num_children != config.max_num_children()
            {
                report.fail(format!(
                    "{} has capacity {} without being an X-tree supernode",
                    id, node.max_num_children
                ));
            }

            let mut tight = BoundingRectangle::new(config.dimension());
            if node.leaf {
                if !node.children.is_empty() {
                    report.fail(format!("leaf {} has children", id));
                }
                match leaf_depth {
                    None => leaf_depth = Some(depth),
                    Some(d) if d != depth => {
                        report.fail(format!("leaf {} at depth {}, expected {}", id, depth, d))
                    }
                    _ => {}
                }
                for &p in &node.points {
                    report.points_reachable += 1;
                    if !self.contains(p) {
                        report.fail(format!("{} in leaf {} was removed", p, id));
                    } else if !seen_points.insert(p) {
                        report.fail(format!("{} is stored more than once", p));
                    }
                    tight.expand_point(&self.dataset[p.0]);
                }
            } else {
                if !node.points.is_empty() {
                    report.fail(format!("internal node {} holds points", id));
                }
                for &child in &node.children {
                    if self.arena[child.0].parent != Some(id) {
                        report.fail(format!("{} does not point back to parent {}", child, id));
                    }
                    tight.expand(&self.arena[child.0].bound);
                    stack.push((child, depth + 1));
                }
            }
            if tight != node.bound {
                report.fail(format!("bound of {} is {}, expected {}", id, node.bound, tight));
            }
        }

        let missing = self.point_ids().filter(|p| !seen_points.contains(p)).count();
        if missing > 0 {
            report.fail(format!("{} live points are unreachable", missing));
        }
        if seen_points.len() != self.size {
            report.fail(format!(
                "{} distinct points reachable, tree reports {}",
                seen_points.len(),
                self.size
            ));
        }
        report
    }
}
