//! Configuration for a rectangle tree.

use serde::{Deserialize, Serialize};

use super::split::SplitPolicy;
use super::tree_constants::{
    DEFAULT_DIMENSION, DEFAULT_MAX_LEAF_SIZE, DEFAULT_MAX_NUM_CHILDREN, DEFAULT_MIN_LEAF_SIZE,
    DEFAULT_MIN_NUM_CHILDREN, MAX_OVERLAP, REINSERT_FRACTION,
};
use super::tree_types::{TreeError, TreeResult};
use crate::metric::Metric;

/// Fixed parameters of a rectangle tree, supplied at construction.
///
/// Fanout bounds must allow every overflow to be split into two valid
/// nodes, i.e. `max >= 2 * min - 1` for both leaves and internal nodes.
/// Invalid combinations are rejected by [`TreeConfig::validate`] before any
/// split logic runs.
///
/// # Examples
///
/// ```rust
/// use rect_tree::{SplitPolicy, TreeConfig};
///
/// let config = TreeConfig::builder()
///     .dimension(3)
///     .leaf_size(2, 4)
///     .num_children(2, 4)
///     .split_policy(SplitPolicy::RStar)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.max_leaf_size(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    dimension: usize,
    min_leaf_size: usize,
    max_leaf_size: usize,
    min_num_children: usize,
    max_num_children: usize,
    split_policy: SplitPolicy,
    metric: Metric,
    reinsert_fraction: f64,
    max_overlap_ratio: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            min_leaf_size: DEFAULT_MIN_LEAF_SIZE,
            max_leaf_size: DEFAULT_MAX_LEAF_SIZE,
            min_num_children: DEFAULT_MIN_NUM_CHILDREN,
            max_num_children: DEFAULT_MAX_NUM_CHILDREN,
            split_policy: SplitPolicy::default(),
            metric: Metric::default(),
            reinsert_fraction: REINSERT_FRACTION,
            max_overlap_ratio: MAX_OVERLAP,
        }
    }
}

impl TreeConfig {
    /// Starts a builder from the default configuration.
    pub fn builder() -> TreeConfigBuilder {
        TreeConfigBuilder {
            config: TreeConfig::default(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn min_leaf_size(&self) -> usize {
        self.min_leaf_size
    }

    pub fn max_leaf_size(&self) -> usize {
        self.max_leaf_size
    }

    pub fn min_num_children(&self) -> usize {
        self.min_num_children
    }

    pub fn max_num_children(&self) -> usize {
        self.max_num_children
    }

    pub fn split_policy(&self) -> SplitPolicy {
        self.split_policy
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn reinsert_fraction(&self) -> f64 {
        self.reinsert_fraction
    }

    pub fn max_overlap_ratio(&self) -> f64 {
        self.max_overlap_ratio
    }

    /// Number of points a forced reinsertion removes from an overflowing leaf.
    pub fn reinsert_count(&self) -> usize {
        (self.max_leaf_size as f64 * self.reinsert_fraction).floor() as usize
    }

    /// Checks that every overflow can be resolved by a valid split.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidConfiguration`] naming the first violated
    /// constraint.
    pub fn validate(&self) -> TreeResult<()> {
        if self.dimension == 0 {
            return Err(invalid("dimension must be at least 1"));
        }
        check_fanout("leaf size", self.min_leaf_size, self.max_leaf_size)?;
        check_fanout("number of children", self.min_num_children, self.max_num_children)?;
        if !(self.reinsert_fraction > 0.0 && self.reinsert_fraction < 1.0) {
            return Err(invalid(&format!(
                "reinsert fraction must be in (0, 1), got {}",
                self.reinsert_fraction
            )));
        }
        if !(self.max_overlap_ratio > 0.0 && self.max_overlap_ratio <= 1.0) {
            return Err(invalid(&format!(
                "max overlap ratio must be in (0, 1], got {}",
                self.max_overlap_ratio
            )));
        }
        Ok(())
    }
}

fn check_fanout(what: &str, min: usize, max: usize) -> TreeResult<()> {
    if min == 0 {
        return Err(invalid(&format!("minimum {} must be at least 1", what)));
    }
    if max < 2 {
        return Err(invalid(&format!("maximum {} must be at least 2", what)));
    }
    if max + 1 < 2 * min {
        return Err(invalid(&format!(
            "maximum {} {} is below 2 * {} - 1; some splits would be infeasible",
            what, max, min
        )));
    }
    Ok(())
}

fn invalid(msg: &str) -> TreeError {
    TreeError::InvalidConfiguration(msg.to_string())
}

/// Chained builder for [`TreeConfig`].
#[derive(Debug, Clone)]
pub struct TreeConfigBuilder {
    config: TreeConfig,
}

impl TreeConfigBuilder {
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.config.dimension = dimension;
        self
    }

    /// Sets the minimum and maximum number of points per leaf.
    pub fn leaf_size(mut self, min: usize, max: usize) -> Self {
        self.config.min_leaf_size = min;
        self.config.max_leaf_size = max;
        self
    }

    /// Sets the minimum and maximum number of children per internal node.
    pub fn num_children(mut self, min: usize, max: usize) -> Self {
        self.config.min_num_children = min;
        self.config.max_num_children = max;
        self
    }

    pub fn split_policy(mut self, policy: SplitPolicy) -> Self {
        self.config.split_policy = policy;
        self
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.config.metric = metric;
        self
    }

    pub fn reinsert_fraction(mut self, fraction: f64) -> Self {
        self.config.reinsert_fraction = fraction;
        self
    }

    pub fn max_overlap_ratio(mut self, ratio: f64) -> Self {
        self.config.max_overlap_ratio = ratio;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> TreeResult<TreeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
