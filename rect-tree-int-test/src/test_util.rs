use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rect_tree::{
    PointId, RectangleTree, SharedRectangleTree, SplitPolicy, TreeConfig, TreeError, TreeResult,
};
use std::collections::HashSet;

pub const ALL_POLICIES: [SplitPolicy; 3] =
    [SplitPolicy::Default, SplitPolicy::RStar, SplitPolicy::XTree];

/// Runs a test between a setup and a teardown step.
///
/// The teardown runs even when the test body fails or panics, and any failure
/// is reported with the step it came from.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> TreeResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> TreeResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> TreeResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let result = std::panic::catch_unwind(|| {
        let ctx = match before() {
            Ok(ctx) => ctx,
            Err(e) => return Err(format!("Before run failed: {:?}", e)),
        };
        match test(ctx.clone()) {
            Ok(_) => after(ctx).map_err(|e| format!("After run failed: {:?}", e)),
            Err(e) => {
                let _ = after(ctx);
                Err(format!("Test failed: {:?}", e))
            }
        }
    });

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("{}", e),
        Err(panic_err) => {
            let msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            panic!("Test panicked: {}", msg);
        }
    }
}

#[derive(Clone)]
pub struct TestContext {
    policy: SplitPolicy,
    tree: SharedRectangleTree,
}

impl TestContext {
    pub fn new(policy: SplitPolicy, tree: SharedRectangleTree) -> Self {
        Self { policy, tree }
    }

    pub fn policy(&self) -> SplitPolicy {
        self.policy
    }

    pub fn tree(&self) -> SharedRectangleTree {
        self.tree.clone()
    }
}

/// Small fanouts so a few hundred points already build a deep tree.
pub fn small_config(policy: SplitPolicy) -> TreeResult<TreeConfig> {
    TreeConfig::builder()
        .dimension(2)
        .leaf_size(2, 5)
        .num_children(2, 4)
        .split_policy(policy)
        .build()
}

pub fn create_test_context(policy: SplitPolicy) -> TreeResult<TestContext> {
    let tree = SharedRectangleTree::new(small_config(policy)?)?;
    Ok(TestContext::new(policy, tree))
}

/// Verifies the tree and empties it.
pub fn cleanup(ctx: TestContext) -> TreeResult<()> {
    let report = ctx.tree().check_integrity();
    ctx.tree().write(|tree| tree.clear());
    if report.is_valid {
        Ok(())
    } else {
        Err(TreeError::InvariantViolation(report.errors.join("; ")))
    }
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Uniform points in `[0, spread)^dim`.
pub fn random_points(rng: &mut StdRng, count: usize, dim: usize, spread: f64) -> Vec<Vec<f64>> {
    (0..count)
        .map(|_| (0..dim).map(|_| rng.gen_range(0.0..spread)).collect())
        .collect()
}

/// Points scattered tightly around a few random centers.
pub fn clustered_points(
    rng: &mut StdRng,
    clusters: usize,
    per_cluster: usize,
    dim: usize,
) -> Vec<Vec<f64>> {
    let mut points = Vec::with_capacity(clusters * per_cluster);
    for _ in 0..clusters {
        let center: Vec<f64> = (0..dim).map(|_| rng.gen_range(0.0..1000.0)).collect();
        for _ in 0..per_cluster {
            points.push(center.iter().map(|c| c + rng.gen_range(-1.0..1.0)).collect());
        }
    }
    points
}

/// Panics with the full report if the tree is structurally broken.
pub fn assert_valid(tree: &RectangleTree) {
    let report = tree.check_integrity();
    assert!(
        report.is_valid,
        "{} tree failed integrity check: {:#?}",
        tree.config().split_policy(),
        report.errors
    );
}

/// Multiset of stored coordinates, comparable regardless of ids or order.
pub fn coordinate_set(tree: &RectangleTree) -> Vec<Vec<u64>> {
    let mut coords: Vec<Vec<u64>> = tree
        .point_ids()
        .filter_map(|id| tree.point(id))
        .map(|p| p.iter().map(|v| v.to_bits()).collect())
        .collect();
    coords.sort();
    coords
}

/// Every point of every reachable leaf.
pub fn stored_ids(tree: &RectangleTree) -> HashSet<PointId> {
    tree.node_ids()
        .into_iter()
        .map(|id| tree.node(id))
        .filter(|node| node.is_leaf())
        .flat_map(|node| node.points().iter().copied())
        .collect()
}
