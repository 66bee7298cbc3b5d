use crate::metric::Metric;
use serde::{Deserialize, Serialize};

/// A closed interval `[lo, hi]` along one dimension.
///
/// An interval with `lo > hi` is empty; the empty interval is the identity of
/// [`Range::union`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower edge
    pub lo: f64,
    /// Upper edge
    pub hi: f64,
}

impl Range {
    pub fn new(lo: f64, hi: f64) -> Range {
        Range { lo, hi }
    }

    /// The empty interval.
    pub fn empty() -> Range {
        Range {
            lo: f64::INFINITY,
            hi: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    /// Width of the interval, zero when empty.
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.hi - self.lo
        }
    }

    pub fn mid(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }

    pub fn expand(&mut self, value: f64) {
        self.lo = self.lo.min(value);
        self.hi = self.hi.max(value);
    }

    pub fn union(&self, other: &Range) -> Range {
        Range::new(self.lo.min(other.lo), self.hi.max(other.hi))
    }

    /// Width of the intersection with `other`, zero when disjoint.
    pub fn overlap(&self, other: &Range) -> f64 {
        if self.hi < other.lo || other.hi < self.lo {
            0.0
        } else {
            (self.hi.min(other.hi) - self.lo.max(other.lo)).max(0.0)
        }
    }
}

/// An axis-aligned hyper-rectangle of fixed dimensionality.
///
/// `BoundingRectangle` is the geometric primitive carried by every node of the
/// rectangle tree. It is an ordered sequence of per-dimension [`Range`]s. The
/// dimensionality is fixed at construction; combining rectangles (or points)
/// of different dimensionality is a precondition violation.
///
/// # Examples
///
/// ```rust
/// use rect_tree::BoundingRectangle;
///
/// let mut bound = BoundingRectangle::from_point(&[0.0, 0.0]);
/// bound.expand_point(&[4.0, 2.0]);
///
/// assert_eq!(bound.volume(), 8.0);
/// assert!(bound.contains(&[1.0, 1.0]));
/// assert_eq!(bound.min_distance_to_point(&[7.0, 6.0]), 5.0);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct BoundingRectangle {
    ranges: Vec<Range>,
}

impl std::fmt::Display for BoundingRectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundingRectangle(")?;
        for (d, range) in self.ranges.iter().enumerate() {
            if d > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}, {}]", range.lo, range.hi)?;
        }
        write!(f, ")")
    }
}

impl std::ops::Index<usize> for BoundingRectangle {
    type Output = Range;

    fn index(&self, dimension: usize) -> &Range {
        &self.ranges[dimension]
    }
}

impl BoundingRectangle {
    /// Creates an empty bound of the given dimensionality.
    pub fn new(dimension: usize) -> BoundingRectangle {
        BoundingRectangle {
            ranges: vec![Range::empty(); dimension],
        }
    }

    /// Creates the degenerate bound holding exactly one point.
    pub fn from_point(point: &[f64]) -> BoundingRectangle {
        BoundingRectangle {
            ranges: point.iter().map(|&v| Range::new(v, v)).collect(),
        }
    }

    pub fn from_ranges(ranges: Vec<Range>) -> BoundingRectangle {
        BoundingRectangle { ranges }
    }

    /// Returns the dimensionality.
    pub fn dim(&self) -> usize {
        self.ranges.len()
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// Returns true if no point is enclosed.
    pub fn is_empty(&self) -> bool {
        self.ranges.iter().any(Range::is_empty)
    }

    /// Resets every dimension to the empty interval.
    pub fn clear(&mut self) {
        for range in &mut self.ranges {
            *range = Range::empty();
        }
    }

    /// Grows this bound to the tightest bound enclosing itself and `point`.
    pub fn expand_point(&mut self, point: &[f64]) {
        debug_assert_eq!(self.dim(), point.len(), "dimensionality mismatch");
        for (range, &v) in self.ranges.iter_mut().zip(point) {
            range.expand(v);
        }
    }

    /// Grows this bound to the tightest bound enclosing itself and `other`.
    pub fn expand(&mut self, other: &BoundingRectangle) {
        debug_assert_eq!(self.dim(), other.dim(), "dimensionality mismatch");
        for (range, o) in self.ranges.iter_mut().zip(&other.ranges) {
            *range = range.union(o);
        }
    }

    /// Returns the union of this bound with another.
    pub fn union(&self, other: &BoundingRectangle) -> BoundingRectangle {
        let mut merged = self.clone();
        merged.expand(other);
        merged
    }

    /// Returns the union of this bound with a point.
    pub fn union_point(&self, point: &[f64]) -> BoundingRectangle {
        let mut merged = self.clone();
        merged.expand_point(point);
        merged
    }

    /// Checks if the point lies inside (edges inclusive).
    pub fn contains(&self, point: &[f64]) -> bool {
        debug_assert_eq!(self.dim(), point.len(), "dimensionality mismatch");
        self.ranges.iter().zip(point).all(|(r, &v)| r.contains(v))
    }

    /// Checks if `other` lies entirely inside this bound.
    pub fn contains_bound(&self, other: &BoundingRectangle) -> bool {
        other.is_empty()
            || self
                .ranges
                .iter()
                .zip(&other.ranges)
                .all(|(r, o)| r.lo <= o.lo && r.hi >= o.hi)
    }

    pub fn intersects(&self, other: &BoundingRectangle) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self
                .ranges
                .iter()
                .zip(&other.ranges)
                .all(|(r, o)| r.lo <= o.hi && r.hi >= o.lo)
    }

    /// Product of the widths. Zero for empty or degenerate bounds.
    pub fn volume(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.ranges.iter().map(Range::width).product()
    }

    /// Sum of the widths along all axes.
    pub fn margin(&self) -> f64 {
        self.ranges.iter().map(Range::width).sum()
    }

    /// Volume of the intersection with `other`.
    pub fn overlap_volume(&self, other: &BoundingRectangle) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        self.ranges
            .iter()
            .zip(&other.ranges)
            .map(|(r, o)| r.overlap(o))
            .product()
    }

    /// Volume added by growing this bound to include `point`.
    pub fn enlargement_for_point(&self, point: &[f64]) -> f64 {
        self.union_point(point).volume() - self.volume()
    }

    /// Volume added by growing this bound to include `other`.
    pub fn enlargement(&self, other: &BoundingRectangle) -> f64 {
        self.union(other).volume() - self.volume()
    }

    /// Returns the center point.
    pub fn center(&self) -> Vec<f64> {
        self.ranges.iter().map(Range::mid).collect()
    }

    /// Length of the longest diagonal under the Euclidean metric.
    pub fn diameter(&self) -> f64 {
        self.diameter_with(Metric::Euclidean)
    }

    pub fn diameter_with(&self, metric: Metric) -> f64 {
        let widths: Vec<f64> = self.ranges.iter().map(Range::width).collect();
        metric.norm(&widths)
    }

    /// Euclidean distance from the point to the nearest point of the bound.
    pub fn min_distance_to_point(&self, point: &[f64]) -> f64 {
        self.min_distance_to_point_with(Metric::Euclidean, point)
    }

    pub fn min_distance_to_point_with(&self, metric: Metric, point: &[f64]) -> f64 {
        debug_assert_eq!(self.dim(), point.len(), "dimensionality mismatch");
        if self.is_empty() {
            return f64::INFINITY;
        }
        let gaps: Vec<f64> = self
            .ranges
            .iter()
            .zip(point)
            .map(|(r, &v)| (r.lo - v).max(v - r.hi).max(0.0))
            .collect();
        metric.norm(&gaps)
    }

    /// Euclidean distance from the point to the farthest corner of the bound.
    pub fn max_distance_to_point(&self, point: &[f64]) -> f64 {
        self.max_distance_to_point_with(Metric::Euclidean, point)
    }

    pub fn max_distance_to_point_with(&self, metric: Metric, point: &[f64]) -> f64 {
        debug_assert_eq!(self.dim(), point.len(), "dimensionality mismatch");
        if self.is_empty() {
            return f64::INFINITY;
        }
        let spans: Vec<f64> = self
            .ranges
            .iter()
            .zip(point)
            .map(|(r, &v)| (v - r.lo).abs().max((r.hi - v).abs()))
            .collect();
        metric.norm(&spans)
    }

    /// Euclidean distance between the closest points of two bounds.
    pub fn min_distance(&self, other: &BoundingRectangle) -> f64 {
        self.min_distance_with(Metric::Euclidean, other)
    }

    pub fn min_distance_with(&self, metric: Metric, other: &BoundingRectangle) -> f64 {
        debug_assert_eq!(self.dim(), other.dim(), "dimensionality mismatch");
        if self.is_empty() || other.is_empty() {
            return f64::INFINITY;
        }
        let gaps: Vec<f64> = self
            .ranges
            .iter()
            .zip(&other.ranges)
            .map(|(r, o)| (o.lo - r.hi).max(r.lo - o.hi).max(0.0))
            .collect();
        metric.norm(&gaps)
    }

    /// Euclidean distance between the farthest points of two bounds.
    pub fn max_distance(&self, other: &BoundingRectangle) -> f64 {
        self.max_distance_with(Metric::Euclidean, other)
    }

    pub fn max_distance_with(&self, metric: Metric, other: &BoundingRectangle) -> f64 {
        debug_assert_eq!(self.dim(), other.dim(), "dimensionality mismatch");
        if self.is_empty() || other.is_empty() {
            return f64::INFINITY;
        }
        let spans: Vec<f64> = self
            .ranges
            .iter()
            .zip(&other.ranges)
            .map(|(r, o)| (o.hi - r.lo).abs().max((r.hi - o.lo).abs()))
            .collect();
        metric.norm(&spans)
    }
}
