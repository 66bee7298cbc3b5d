//! L-p metrics used by bound distances and forced reinsertion.

use serde::{Deserialize, Serialize};

/// An L-p metric over coordinate vectors.
///
/// The rectangle bound computes per-dimension gaps and hands them to
/// [`Metric::norm`], so every distance the tree computes is consistent with
/// the metric chosen in the tree configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Metric {
    /// L1, sum of absolute differences.
    Manhattan,
    /// L2 with the square root taken.
    #[default]
    Euclidean,
    /// L2 without the square root. Cheaper, and preserves ordering.
    SquaredEuclidean,
    /// L-infinity, largest absolute difference.
    Chebyshev,
}

impl Metric {
    /// Distance between two points of equal dimensionality.
    pub fn evaluate(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len(), "metric evaluated on mismatched dimensions");
        self.fold(a.iter().zip(b).map(|(x, y)| (x - y).abs()))
    }

    /// Norm of a vector of non-negative per-dimension deltas.
    pub fn norm(&self, deltas: &[f64]) -> f64 {
        self.fold(deltas.iter().map(|d| d.abs()))
    }

    fn fold<I: Iterator<Item = f64>>(&self, deltas: I) -> f64 {
        match self {
            Metric::Manhattan => deltas.sum(),
            Metric::Euclidean => deltas.map(|d| d * d).sum::<f64>().sqrt(),
            Metric::SquaredEuclidean => deltas.map(|d| d * d).sum(),
            Metric::Chebyshev => deltas.fold(0.0, f64::max),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Metric::Manhattan => "L1",
            Metric::Euclidean => "L2",
            Metric::SquaredEuclidean => "L2^2",
            Metric::Chebyshev => "Linf",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_euclidean() {
        assert_eq!(Metric::default(), Metric::Euclidean);
    }

    #[test]
    fn test_evaluate() {
        let a = [0.0, 0.0];
        let b = [3.0, -4.0];
        assert_eq!(Metric::Manhattan.evaluate(&a, &b), 7.0);
        assert_eq!(Metric::Euclidean.evaluate(&a, &b), 5.0);
        assert_eq!(Metric::SquaredEuclidean.evaluate(&a, &b), 25.0);
        assert_eq!(Metric::Chebyshev.evaluate(&a, &b), 4.0);
    }

    #[test]
    fn test_norm_of_zero_vector() {
        for metric in [
            Metric::Manhattan,
            Metric::Euclidean,
            Metric::SquaredEuclidean,
            Metric::Chebyshev,
        ] {
            assert_eq!(metric.norm(&[0.0, 0.0, 0.0]), 0.0);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Metric::Euclidean.to_string(), "L2");
        assert_eq!(Metric::Chebyshev.to_string(), "Linf");
    }
}
