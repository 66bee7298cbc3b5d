//! Quadratic R-tree split (Guttman).

use std::cmp::Ordering;

use super::{halve, Partition, SplitDecision, SplitKind, SplitStrategy};
use crate::bound::BoundingRectangle;
use crate::rect_tree::tree_impl::RectangleTree;
use crate::rect_tree::tree_types::{NodeId, Relevels};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DefaultSplit;

impl SplitStrategy for DefaultSplit {
    fn split_leaf(
        &self,
        tree: &RectangleTree,
        leaf: NodeId,
        _relevels: &mut Relevels,
    ) -> SplitDecision {
        let bounds = tree.entry_bounds(leaf);
        SplitDecision::Partition(quadratic_split(&bounds, tree.config().min_leaf_size()))
    }

    fn split_non_leaf(&self, tree: &RectangleTree, node: NodeId) -> SplitDecision {
        let bounds = tree.entry_bounds(node);
        SplitDecision::Partition(quadratic_split(&bounds, tree.config().min_num_children()))
    }
}

/// Divides `bounds` into two groups of at least `min_fanout` entries.
///
/// When every entry has the same bound no seed pair wastes any space, so the
/// entries are halved by insertion order and the partition is marked
/// [`SplitKind::Degenerate`].
pub(crate) fn quadratic_split(bounds: &[BoundingRectangle], min_fanout: usize) -> Partition {
    let n = bounds.len();
    if n < 2 || bounds.iter().all(|b| *b == bounds[0]) {
        log::debug!("All {} entries share one bound, splitting by insertion order", n);
        return halve(n);
    }

    let (seed_a, seed_b) = pick_seeds(bounds);
    let mut first = vec![seed_a];
    let mut second = vec![seed_b];
    let mut first_bound = bounds[seed_a].clone();
    let mut second_bound = bounds[seed_b].clone();
    let mut remaining: Vec<usize> = (0..n).filter(|&i| i != seed_a && i != seed_b).collect();

    while !remaining.is_empty() {
        // Hand everything left to a group that needs it to reach the minimum
        if first.len() + remaining.len() <= min_fanout {
            first.append(&mut remaining);
            break;
        }
        if second.len() + remaining.len() <= min_fanout {
            second.append(&mut remaining);
            break;
        }

        let (pos, d1, d2) = pick_next(bounds, &remaining, &first_bound, &second_bound);
        let entry = remaining.remove(pos);
        let to_first = match d1.partial_cmp(&d2) {
            Some(Ordering::Less) => true,
            Some(Ordering::Greater) => false,
            _ => {
                let (v1, v2) = (first_bound.volume(), second_bound.volume());
                if v1 != v2 {
                    v1 < v2
                } else {
                    first.len() <= second.len()
                }
            }
        };

        if to_first {
            first_bound.expand(&bounds[entry]);
            first.push(entry);
        } else {
            second_bound.expand(&bounds[entry]);
            second.push(entry);
        }
    }

    Partition::new(first, second, SplitKind::Quadratic)
}

/// The pair that would waste the most space if grouped together, ties broken
/// by the larger distance between centers.
fn pick_seeds(bounds: &[BoundingRectangle]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut best_score = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for i in 0..bounds.len() {
        for j in (i + 1)..bounds.len() {
            let dead = bounds[i].union(&bounds[j]).volume() - bounds[i].volume() - bounds[j].volume();
            let spread = center_distance(&bounds[i], &bounds[j]);
            if dead > best_score.0 || (dead == best_score.0 && spread > best_score.1) {
                best = (i, j);
                best_score = (dead, spread);
            }
        }
    }
    best
}

/// The remaining entry with the strongest preference for one group.
fn pick_next(
    bounds: &[BoundingRectangle],
    remaining: &[usize],
    first: &BoundingRectangle,
    second: &BoundingRectangle,
) -> (usize, f64, f64) {
    let mut best = (0, 0.0, 0.0);
    let mut best_diff = f64::NEG_INFINITY;
    for (pos, &entry) in remaining.iter().enumerate() {
        let d1 = first.enlargement(&bounds[entry]);
        let d2 = second.enlargement(&bounds[entry]);
        let diff = (d1 - d2).abs();
        if diff > best_diff {
            best = (pos, d1, d2);
            best_diff = diff;
        }
    }
    best
}

fn center_distance(a: &BoundingRectangle, b: &BoundingRectangle) -> f64 {
    a.center()
        .iter()
        .zip(b.center())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[[f64; 2]]) -> Vec<BoundingRectangle> {
        coords.iter().map(|c| BoundingRectangle::from_point(c)).collect()
    }

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn test_two_clumps_are_separated() {
        let bounds = points(&[
            [0.0, 0.0],
            [10.0, 10.0],
            [0.1, 0.1],
            [10.1, 10.1],
            [0.2, 0.2],
            [10.2, 10.2],
        ]);
        let partition = quadratic_split(&bounds, 3);
        let mut groups = [sorted(partition.first), sorted(partition.second)];
        groups.sort();
        assert_eq!(groups, [vec![0, 2, 4], vec![1, 3, 5]]);
        assert_eq!(partition.kind, SplitKind::Quadratic);
    }

    #[test]
    fn test_minimum_fill_is_forced() {
        // One outlier would attract a single entry without the minimum rule
        let bounds = points(&[
            [0.0, 0.0],
            [0.1, 0.0],
            [0.2, 0.0],
            [0.3, 0.0],
            [100.0, 100.0],
        ]);
        let partition = quadratic_split(&bounds, 2);
        assert!(partition.first.len() >= 2);
        assert!(partition.second.len() >= 2);
        assert_eq!(partition.first.len() + partition.second.len(), 5);
    }

    #[test]
    fn test_identical_entries_split_by_insertion_order() {
        let bounds = points(&[[1.0, 1.0]; 5]);
        let partition = quadratic_split(&bounds, 2);
        assert_eq!(partition.kind, SplitKind::Degenerate);
        assert_eq!(partition.first, vec![0, 1]);
        assert_eq!(partition.second, vec![2, 3, 4]);
    }

    #[test]
    fn test_collinear_points_use_center_distance() {
        // All pairs waste zero area; the extreme pair must be chosen as seeds
        let bounds = points(&[[1.0, 0.0], [0.0, 0.0], [3.0, 0.0], [2.0, 0.0]]);
        assert_eq!(pick_seeds(&bounds), (1, 2));
    }
}
