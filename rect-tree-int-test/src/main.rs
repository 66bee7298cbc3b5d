use rand::Rng;
use rect_tree::{RectangleTree, SplitPolicy, TreeConfig, TreeResult};
use rect_tree_int_test::test_util::{assert_valid, seeded_rng, ALL_POLICIES};

fn main() -> TreeResult<()> {
    println!("Starting split stress test...");
    let count = 200_000;

    for policy in ALL_POLICIES {
        let config = TreeConfig::builder()
            .dimension(3)
            .leaf_size(8, 20)
            .num_children(2, 5)
            .split_policy(policy)
            .build()?;
        let mut tree = RectangleTree::new(config)?;
        let mut rng = seeded_rng(42);

        let start = std::time::Instant::now();
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let point = [
                rng.gen_range(0.0..1000.0),
                rng.gen_range(0.0..1000.0),
                rng.gen_range(0.0..1000.0),
            ];
            ids.push(tree.insert(&point)?);
        }
        println!(
            "{}: inserted {} points in {:?}, height {}",
            policy,
            count,
            start.elapsed(),
            tree.height()
        );

        let start = std::time::Instant::now();
        for id in ids.iter().step_by(3) {
            tree.remove(*id)?;
        }
        println!("{}: removed a third in {:?}", policy, start.elapsed());

        assert_valid(&tree);
        println!("{}: {:?}", policy, tree.stats());
        if policy == SplitPolicy::XTree {
            println!(
                "{}: largest accepted overlap ratio {:.4}",
                policy,
                tree.stats().max_accepted_overlap_ratio
            );
        }
    }
    Ok(())
}
