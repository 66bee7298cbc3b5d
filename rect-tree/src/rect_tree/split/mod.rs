//! Node split strategies.
//!
//! A strategy only decides how an overflowing node should be resolved. The
//! structural work (allocating the two replacement nodes, fixing parent
//! pointers, growing the root, cascading upward) lives in the propagator so
//! every policy shares the same tree mutations.

mod default_split;
mod r_star_split;
mod x_tree_split;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::descent::Descent;
use super::tree_impl::RectangleTree;
use super::tree_types::{NodeId, Relevels};
use crate::bound::BoundingRectangle;

pub(crate) use default_split::DefaultSplit;
pub(crate) use r_star_split::RStarSplit;
pub(crate) use x_tree_split::XTreeSplit;

/// Which split algorithm a tree uses, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SplitPolicy {
    /// Classic quadratic R-tree split.
    #[default]
    Default,
    /// R*-tree split with forced reinsertion of leaf entries.
    RStar,
    /// X-tree split: R* partitioning guarded by an overlap bound, with
    /// supernodes for directories that cannot be split cleanly.
    XTree,
}

impl SplitPolicy {
    pub(crate) fn strategy(self) -> &'static dyn SplitStrategy {
        match self {
            SplitPolicy::Default => &DefaultSplit,
            SplitPolicy::RStar => &RStarSplit,
            SplitPolicy::XTree => &XTreeSplit,
        }
    }

    pub(crate) fn descent(self) -> Descent {
        match self {
            SplitPolicy::Default => Descent::RTree,
            SplitPolicy::RStar | SplitPolicy::XTree => Descent::RStar,
        }
    }
}

impl std::fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SplitPolicy::Default => "R-tree",
            SplitPolicy::RStar => "R*-tree",
            SplitPolicy::XTree => "X-tree",
        };
        write!(f, "{}", name)
    }
}

/// Decides how an overflowing node is resolved.
///
/// Implementations must not mutate the tree. Every decision is applied by the
/// propagator.
pub(crate) trait SplitStrategy: Sync {
    /// Called for a non-root leaf holding `max_leaf_size + 1` points.
    fn split_leaf(
        &self,
        tree: &RectangleTree,
        leaf: NodeId,
        relevels: &mut Relevels,
    ) -> SplitDecision;

    /// Called for a non-root internal node with more children than its
    /// capacity.
    fn split_non_leaf(&self, tree: &RectangleTree, node: NodeId) -> SplitDecision;

    /// Whether replacement nodes inherit the split history with the chosen
    /// axis marked.
    fn records_history(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SplitDecision {
    Partition(Partition),
    /// Remove and reinsert `count` points of the leaf.
    Reinsert { count: usize },
    /// Double the node's capacity instead of splitting it.
    Supernode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SplitKind {
    Quadratic,
    /// Every entry had the same bound; split by insertion order.
    Degenerate,
    Margin,
    MinOverlap,
}

/// Entry indices of the node being split, divided into two groups.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Partition {
    pub first: Vec<usize>,
    pub second: Vec<usize>,
    pub axis: Option<usize>,
    pub kind: SplitKind,
    /// Overlap ratio of an accepted X-tree directory split.
    pub overlap_ratio: Option<f64>,
}

impl Partition {
    pub(crate) fn new(first: Vec<usize>, second: Vec<usize>, kind: SplitKind) -> Self {
        Partition {
            first,
            second,
            axis: None,
            kind,
            overlap_ratio: None,
        }
    }
}

// ============================================================================
// Shared R*-style scoring
// ============================================================================

/// Which edge of the entry bounds an axis sort uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    Low,
    High,
}

/// Cost of cutting a sorted entry list after `cut` entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Distribution {
    pub cut: usize,
    pub margin: f64,
    pub area: f64,
    pub overlap: f64,
}

impl Distribution {
    /// Overlap relative to the combined volume of both groups, 0 when both
    /// groups are flat.
    pub(crate) fn overlap_ratio(&self) -> f64 {
        if self.area > 0.0 {
            self.overlap / self.area
        } else {
            0.0
        }
    }

    fn beats(&self, other: &Distribution) -> bool {
        self.overlap < other.overlap || (self.overlap == other.overlap && self.area < other.area)
    }
}

/// Every candidate distribution along one axis sort.
#[derive(Debug, Clone)]
pub(crate) struct AxisScore {
    pub axis: usize,
    pub edge: Edge,
    pub order: Vec<usize>,
    pub margin_sum: f64,
    pub distributions: Vec<Distribution>,
}

impl AxisScore {
    /// Index of the distribution with the least overlap, ties to least area.
    pub(crate) fn best(&self) -> usize {
        let mut best = 0;
        for (i, d) in self.distributions.iter().enumerate().skip(1) {
            if d.beats(&self.distributions[best]) {
                best = i;
            }
        }
        best
    }

    pub(crate) fn partition(&self, index: usize, kind: SplitKind) -> Partition {
        let cut = self.distributions[index].cut;
        Partition {
            first: self.order[..cut].to_vec(),
            second: self.order[cut..].to_vec(),
            axis: Some(self.axis),
            kind,
            overlap_ratio: None,
        }
    }
}

/// Sorts the entries along `axis` by `edge` and scores every cut that leaves
/// at least `min_fanout` entries on each side.
pub(crate) fn score_axis(
    bounds: &[BoundingRectangle],
    axis: usize,
    edge: Edge,
    min_fanout: usize,
) -> AxisScore {
    let n = bounds.len();
    let key = |i: usize| match edge {
        Edge::Low => bounds[i][axis].lo,
        Edge::High => bounds[i][axis].hi,
    };
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));

    // prefix[i] bounds order[..=i], suffix[i] bounds order[i..]
    let dim = bounds.first().map_or(0, |b| b.dim());
    let mut prefix = Vec::with_capacity(n);
    let mut acc = BoundingRectangle::new(dim);
    for &i in &order {
        acc.expand(&bounds[i]);
        prefix.push(acc.clone());
    }
    let mut suffix = vec![BoundingRectangle::new(dim); n];
    let mut acc = BoundingRectangle::new(dim);
    for pos in (0..n).rev() {
        acc.expand(&bounds[order[pos]]);
        suffix[pos] = acc.clone();
    }

    let lo = min_fanout.min(n / 2).max(1);
    let hi = n.saturating_sub(lo);
    let mut distributions = Vec::new();
    let mut margin_sum = 0.0;
    for cut in lo..=hi {
        if cut == 0 || cut >= n {
            continue;
        }
        let first = &prefix[cut - 1];
        let second = &suffix[cut];
        let margin = first.margin() + second.margin();
        margin_sum += margin;
        distributions.push(Distribution {
            cut,
            margin,
            area: first.volume() + second.volume(),
            overlap: first.overlap_volume(second),
        });
    }

    AxisScore {
        axis,
        edge,
        order,
        margin_sum,
        distributions,
    }
}

/// Scores every (edge, axis) sort and returns the one with the smallest
/// margin sum. The first sort wins ties, so low edges beat high edges.
pub(crate) fn choose_margin_axis(
    bounds: &[BoundingRectangle],
    dimension: usize,
    edges: &[Edge],
    min_fanout: usize,
) -> Option<AxisScore> {
    let mut best: Option<AxisScore> = None;
    for &edge in edges {
        for axis in 0..dimension {
            let score = score_axis(bounds, axis, edge, min_fanout);
            if score.distributions.is_empty() {
                continue;
            }
            if best.as_ref().map_or(true, |b| score.margin_sum < b.margin_sum) {
                best = Some(score);
            }
        }
    }
    best
}

/// Splits entries by insertion order, used when no geometric split exists.
pub(crate) fn halve(count: usize) -> Partition {
    let mid = count / 2;
    Partition::new((0..mid).collect(), (mid..count).collect(), SplitKind::Degenerate)
}
