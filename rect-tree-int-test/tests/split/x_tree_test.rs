use rect_tree::{RectangleTree, SplitPolicy, TreeConfig, TreeResult};
use rect_tree_int_test::test_util::{
    assert_valid, clustered_points, random_points, seeded_rng, small_config,
};

fn x_tree_with(points: &[Vec<f64>], config: TreeConfig) -> TreeResult<RectangleTree> {
    let mut tree = RectangleTree::new(config)?;
    for p in points {
        tree.insert(p)?;
        assert_valid(&tree);
    }
    Ok(tree)
}

#[test]
fn test_accepted_splits_stay_under_overlap_ratio() -> TreeResult<()> {
    let mut rng = seeded_rng(21);
    let points = random_points(&mut rng, 500, 2, 100.0);
    let tree = x_tree_with(&points, small_config(SplitPolicy::XTree)?)?;

    let stats = tree.stats();
    assert!(stats.leaf_splits > 0);
    assert!(
        stats.max_accepted_overlap_ratio < tree.config().max_overlap_ratio(),
        "accepted a split with overlap ratio {}",
        stats.max_accepted_overlap_ratio
    );
    Ok(())
}

#[test]
fn test_supernode_capacities_are_doublings() -> TreeResult<()> {
    let mut rng = seeded_rng(22);
    let points = clustered_points(&mut rng, 3, 150, 3);
    let config = TreeConfig::builder()
        .dimension(3)
        .leaf_size(2, 5)
        .num_children(2, 4)
        .split_policy(SplitPolicy::XTree)
        .max_overlap_ratio(0.05)
        .build()?;
    let tree = x_tree_with(&points, config)?;

    let base = tree.config().max_num_children();
    let mut grown = 0;
    for id in tree.node_ids() {
        let node = tree.node(id);
        if node.is_leaf() {
            continue;
        }
        let capacity = node.max_num_children();
        assert_eq!(capacity % base, 0);
        assert!((capacity / base).is_power_of_two());
        if capacity > base {
            grown += 1;
        }
    }
    if grown > 0 {
        assert!(tree.stats().supernode_growths > 0);
    }
    Ok(())
}

#[test]
fn test_split_history_marks_last_axis() -> TreeResult<()> {
    let mut rng = seeded_rng(23);
    let points = random_points(&mut rng, 300, 3, 10.0);
    let config = TreeConfig::builder()
        .dimension(3)
        .leaf_size(2, 5)
        .num_children(2, 4)
        .split_policy(SplitPolicy::XTree)
        .build()?;
    let tree = x_tree_with(&points, config)?;

    let mut split_nodes = 0;
    for id in tree.node_ids() {
        let history = tree.node(id).split_history();
        let any_used = (0..3).any(|axis| history.is_used(axis));
        if any_used {
            split_nodes += 1;
            assert!(history.is_used(history.last_dimension()));
        }
    }
    assert!(split_nodes > 0);
    Ok(())
}

#[test]
fn test_other_policies_never_grow_supernodes() -> TreeResult<()> {
    for policy in [SplitPolicy::Default, SplitPolicy::RStar] {
        let mut rng = seeded_rng(24);
        let mut tree = RectangleTree::new(small_config(policy)?)?;
        for p in clustered_points(&mut rng, 4, 80, 2) {
            tree.insert(&p)?;
        }
        assert_eq!(tree.stats().supernode_growths, 0);
        for id in tree.node_ids() {
            let node = tree.node(id);
            if !node.is_leaf() {
                assert_eq!(node.max_num_children(), tree.config().max_num_children());
            }
            assert!(!node.split_history().is_used(0));
        }
    }
    Ok(())
}
