//! RectangleTree implementation.

use std::mem;

use crate::bound::BoundingRectangle;

use super::config::TreeConfig;
use super::tree_types::{
    Node, NodeId, PointId, Relevels, SplitStats, TreeError, TreeResult,
};

/// An in-memory rectangle tree over points of fixed dimensionality.
///
/// Nodes live in an arena addressed by [`NodeId`]; retired nodes are kept on
/// a free list and reused by later splits. The root's identity never changes:
/// when the root overflows its contents move into a fresh child instead.
///
/// # Examples
///
/// ```rust
/// use rect_tree::{RectangleTree, SplitPolicy, TreeConfig};
///
/// let config = TreeConfig::builder()
///     .leaf_size(2, 4)
///     .split_policy(SplitPolicy::RStar)
///     .build()?;
/// let mut tree = RectangleTree::new(config)?;
///
/// let id = tree.insert(&[1.0, 2.0])?;
/// assert!(tree.contains(id));
/// assert_eq!(tree.len(), 1);
/// # Ok::<(), rect_tree::TreeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RectangleTree {
    pub(crate) config: TreeConfig,
    /// Coordinates by point id. Kept after removal so ids are never reused.
    pub(crate) dataset: Vec<Vec<f64>>,
    pub(crate) live: Vec<bool>,
    pub(crate) arena: Vec<Node>,
    /// Retired node slots available for reuse
    pub(crate) free_nodes: Vec<NodeId>,
    pub(crate) root: NodeId,
    pub(crate) size: usize,
    pub(crate) stats: SplitStats,
}

impl RectangleTree {
    /// Creates an empty tree whose root is an empty leaf.
    pub fn new(config: TreeConfig) -> TreeResult<Self> {
        config.validate()?;
        let root = Node::new(
            true,
            config.dimension(),
            None,
            config.max_num_children(),
        );
        log::debug!(
            "Created {} tree: dim={}, leaf size {}..={}, children {}..={}",
            config.split_policy(),
            config.dimension(),
            config.min_leaf_size(),
            config.max_leaf_size(),
            config.min_num_children(),
            config.max_num_children()
        );
        Ok(Self {
            config,
            dataset: Vec::new(),
            live: Vec::new(),
            arena: vec![root],
            free_nodes: Vec::new(),
            root: NodeId(0),
            size: 0,
            stats: SplitStats::default(),
        })
    }

    /// Creates a tree and inserts every point in order.
    pub fn with_points<I, P>(config: TreeConfig, points: I) -> TreeResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[f64]>,
    {
        let mut tree = Self::new(config)?;
        for point in points {
            tree.insert(point.as_ref())?;
        }
        Ok(tree)
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn dim(&self) -> usize {
        self.config.dimension()
    }

    /// Number of live points.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id.0]
    }

    pub fn stats(&self) -> &SplitStats {
        &self.stats
    }

    /// Number of levels above the leaves, 0 when the root is a leaf.
    pub fn height(&self) -> usize {
        self.level_of(self.root)
    }

    /// Level of `node` counted from the leaves (leaf = 0).
    pub fn level_of(&self, node: NodeId) -> usize {
        let mut level = 0;
        let mut current = &self.arena[node.0];
        while let Some(&child) = current.children.first() {
            level += 1;
            current = &self.arena[child.0];
        }
        level
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.live.get(id.0).copied().unwrap_or(false)
    }

    /// Coordinates of a live point.
    pub fn point(&self, id: PointId) -> Option<&[f64]> {
        if self.contains(id) {
            Some(&self.dataset[id.0])
        } else {
            None
        }
    }

    /// Ids of every live point, in insertion order.
    pub fn point_ids(&self) -> impl Iterator<Item = PointId> + '_ {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, &live)| live)
            .map(|(i, _)| PointId(i))
    }

    /// Every node reachable from the root, parents before children.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.arena[id.0].children.iter().rev().copied());
        }
        out
    }

    /// Inserts a point and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DimensionMismatch`] if the point has the wrong
    /// number of coordinates and [`TreeError::InvalidPoint`] if any coordinate
    /// is not finite.
    pub fn insert(&mut self, point: &[f64]) -> TreeResult<PointId> {
        self.check_point(point)?;
        let id = PointId(self.dataset.len());
        self.dataset.push(point.to_vec());
        self.live.push(false);

        let mut relevels = Relevels::new(self.height());
        self.insert_point_with(id, &mut relevels)?;
        self.live[id.0] = true;
        self.size += 1;
        log::trace!("Inserted {} at {:?}", id, point);
        Ok(id)
    }

    /// Removes a point. Returns `false` if it was not live.
    pub fn remove(&mut self, id: PointId) -> TreeResult<bool> {
        if !self.contains(id) {
            return Ok(false);
        }
        let mut relevels = Relevels::new(self.height());
        if !self.delete_point(id, &mut relevels)? {
            return Err(TreeError::InvariantViolation(format!(
                "live point {} is not reachable from the root",
                id
            )));
        }
        self.live[id.0] = false;
        self.size -= 1;
        self.shrink_root();
        log::trace!("Removed {}", id);
        Ok(true)
    }

    /// Root-to-leaf path of nodes whose bounds lead to the leaf holding `id`.
    pub fn path_to(&self, id: PointId) -> Option<Vec<NodeId>> {
        let point = self.point(id)?;
        let mut path = Vec::new();
        if self.search_path(self.root, id, point, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    /// Leaf currently holding `id`.
    pub fn find_leaf(&self, id: PointId) -> Option<NodeId> {
        self.path_to(id).and_then(|path| path.last().copied())
    }

    fn search_path(&self, node: NodeId, id: PointId, point: &[f64], path: &mut Vec<NodeId>) -> bool {
        let current = &self.arena[node.0];
        if !current.bound.contains(point) {
            return false;
        }
        path.push(node);
        if current.leaf {
            if current.points.contains(&id) {
                return true;
            }
        } else {
            for &child in &current.children {
                if self.search_path(child, id, point, path) {
                    return true;
                }
            }
        }
        path.pop();
        false
    }

    /// Ids of the live points inside `query` (boundary included).
    pub fn find_within(&self, query: &BoundingRectangle) -> TreeResult<Vec<PointId>> {
        if query.dim() != self.dim() {
            return Err(TreeError::DimensionMismatch {
                expected: self.dim(),
                found: query.dim(),
            });
        }
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.arena[id.0];
            if !node.bound.intersects(query) {
                continue;
            }
            if node.leaf {
                out.extend(
                    node.points
                        .iter()
                        .copied()
                        .filter(|p| query.contains(&self.dataset[p.0])),
                );
            } else {
                stack.extend(node.children.iter().copied());
            }
        }
        out.sort_unstable();
        Ok(out)
    }

    /// Removes every point. Ids handed out earlier stay invalid.
    pub fn clear(&mut self) {
        self.live.iter_mut().for_each(|live| *live = false);
        self.arena = vec![Node::new(
            true,
            self.config.dimension(),
            None,
            self.config.max_num_children(),
        )];
        self.free_nodes.clear();
        self.root = NodeId(0);
        self.size = 0;
    }

    fn check_point(&self, point: &[f64]) -> TreeResult<()> {
        if point.len() != self.dim() {
            return Err(TreeError::DimensionMismatch {
                expected: self.dim(),
                found: point.len(),
            });
        }
        if let Some(bad) = point.iter().find(|v| !v.is_finite()) {
            return Err(TreeError::InvalidPoint(format!(
                "coordinate {} is not finite",
                bad
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Arena
    // ------------------------------------------------------------------------

    pub(crate) fn coords(&self, id: PointId) -> &[f64] {
        &self.dataset[id.0]
    }

    /// Bounds of the entries of `node`: one degenerate bound per point for a
    /// leaf, the child bounds otherwise.
    pub(crate) fn entry_bounds(&self, node: NodeId) -> Vec<BoundingRectangle> {
        let node = &self.arena[node.0];
        if node.leaf {
            node.points
                .iter()
                .map(|&p| BoundingRectangle::from_point(self.coords(p)))
                .collect()
        } else {
            node.children
                .iter()
                .map(|&c| self.arena[c.0].bound.clone())
                .collect()
        }
    }

    pub(crate) fn allocate_node(
        &mut self,
        leaf: bool,
        parent: Option<NodeId>,
        max_num_children: usize,
    ) -> NodeId {
        let node = Node::new(leaf, self.config.dimension(), parent, max_num_children);
        if let Some(id) = self.free_nodes.pop() {
            self.arena[id.0] = node;
            id
        } else {
            self.arena.push(node);
            NodeId(self.arena.len() - 1)
        }
    }

    /// Soft-deletes a node that is no longer referenced. Its contents must
    /// already have been moved elsewhere.
    pub(crate) fn retire_node(&mut self, id: NodeId) {
        let node = &mut self.arena[id.0];
        node.retired = true;
        node.points.clear();
        node.children.clear();
        node.parent = None;
        node.bound.clear();
        self.free_nodes.push(id);
    }

    /// Recomputes a tight bound from the node's entries.
    pub(crate) fn recompute_bound(&mut self, id: NodeId) {
        let mut bound = BoundingRectangle::new(self.config.dimension());
        let node = &self.arena[id.0];
        if node.leaf {
            for &p in &node.points {
                bound.expand_point(&self.dataset[p.0]);
            }
        } else {
            for &c in &node.children {
                bound.expand(&self.arena[c.0].bound);
            }
        }
        self.arena[id.0].bound = bound;
    }

    // ------------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------------

    /// Inserts an already registered point, resolving any overflow. Used by
    /// top-level insertion and by every reinsertion in the same cascade.
    pub(crate) fn insert_point_with(&mut self, id: PointId, relevels: &mut Relevels) -> TreeResult<()> {
        let leaf = self.choose_leaf(id)?;
        self.arena[leaf.0].insert_point(id, &self.dataset[id.0]);
        if self.arena[leaf.0].points.len() > self.config.max_leaf_size() {
            self.resolve_leaf_overflow(leaf, relevels)?;
        }
        Ok(())
    }

    /// Descends from the root, growing each bound on the way to include the
    /// point.
    fn choose_leaf(&mut self, id: PointId) -> TreeResult<NodeId> {
        let descent = self.config.split_policy().descent();
        let mut node = self.root;
        loop {
            self.arena[node.0].bound.expand_point(&self.dataset[id.0]);
            if self.arena[node.0].leaf {
                return Ok(node);
            }
            if self.arena[node.0].children.is_empty() {
                return Err(TreeError::InvariantViolation(format!(
                    "internal node {} has no children",
                    node
                )));
            }
            let idx = descent.choose_child(self, node, &self.dataset[id.0]);
            node = self.arena[node.0].children[idx];
        }
    }

    // ------------------------------------------------------------------------
    // Deletion
    // ------------------------------------------------------------------------

    /// Removes a point from its leaf and condenses the tree. The dataset slot
    /// is left alone so the point can be reinserted.
    pub(crate) fn delete_point(&mut self, id: PointId, relevels: &mut Relevels) -> TreeResult<bool> {
        let Some(leaf) = self.find_leaf_any(id) else {
            return Ok(false);
        };
        self.arena[leaf.0].points.retain(|&p| p != id);
        self.condense(leaf, relevels)?;
        Ok(true)
    }

    /// Like [`find_leaf`](Self::find_leaf) but also finds points that are
    /// temporarily detached from the live set.
    fn find_leaf_any(&self, id: PointId) -> Option<NodeId> {
        let point = self.dataset.get(id.0)?;
        let mut path = Vec::new();
        if self.search_path(self.root, id, point, &mut path) {
            path.last().copied()
        } else {
            None
        }
    }

    /// Walks from `start` to the root, dropping underfull nodes and
    /// tightening bounds, then reinserts the points of dropped subtrees.
    fn condense(&mut self, start: NodeId, relevels: &mut Relevels) -> TreeResult<()> {
        let mut orphans = Vec::new();
        let mut node = start;
        while let Some(parent) = self.arena[node.0].parent {
            let current = &self.arena[node.0];
            let min = if current.leaf {
                self.config.min_leaf_size()
            } else {
                self.config.min_num_children()
            };
            if current.len() < min {
                let siblings = &mut self.arena[parent.0].children;
                let pos = siblings.iter().position(|&c| c == node).ok_or_else(|| {
                    TreeError::InvariantViolation(format!(
                        "{} is missing from the children of its parent {}",
                        node, parent
                    ))
                })?;
                siblings.remove(pos);
                self.detach_subtree(node, &mut orphans);
            } else {
                self.recompute_bound(node);
            }
            node = parent;
        }

        let root = self.root;
        if !self.arena[root.0].leaf && self.arena[root.0].children.is_empty() {
            let root_node = &mut self.arena[root.0];
            root_node.leaf = true;
            root_node.max_num_children = self.config.max_num_children();
        }
        self.recompute_bound(root);

        if !orphans.is_empty() {
            log::debug!("Condense reinserting {} orphaned points", orphans.len());
        }
        for id in orphans {
            self.insert_point_with(id, relevels)?;
        }
        Ok(())
    }

    /// Retires every node under `node` and collects their points.
    fn detach_subtree(&mut self, node: NodeId, points: &mut Vec<PointId>) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let current = &mut self.arena[id.0];
            points.append(&mut current.points);
            stack.append(&mut current.children);
            self.retire_node(id);
        }
    }

    /// Collapses a root that has a single internal child, keeping the root id.
    fn shrink_root(&mut self) {
        loop {
            let root = self.root;
            let only_child = match self.arena[root.0].children.as_slice() {
                [child] if !self.arena[root.0].leaf => *child,
                _ => return,
            };

            let child = &mut self.arena[only_child.0];
            let leaf = child.leaf;
            let points = mem::take(&mut child.points);
            let children = mem::take(&mut child.children);
            let bound = child.bound.clone();
            let max_num_children = child.max_num_children;
            let history = child.split_history.clone();
            self.retire_node(only_child);

            for &grandchild in &children {
                self.arena[grandchild.0].parent = Some(root);
            }
            let root_node = &mut self.arena[root.0];
            root_node.leaf = leaf;
            root_node.points = points;
            root_node.children = children;
            root_node.bound = bound;
            root_node.max_num_children = max_num_children;
            root_node.split_history = history;
            log::debug!("Collapsed {} into root {}", only_child, root);
        }
    }
}
