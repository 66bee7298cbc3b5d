use rect_tree::{RectangleTree, SplitPolicy, TreeConfig, TreeResult};
use rect_tree_int_test::test_util::{
    assert_valid, coordinate_set, random_points, seeded_rng, small_config, ALL_POLICIES,
};

#[test]
fn test_default_split_separates_two_clumps() -> TreeResult<()> {
    let config = TreeConfig::builder()
        .leaf_size(3, 5)
        .split_policy(SplitPolicy::Default)
        .build()?;
    let mut tree = RectangleTree::new(config)?;

    // Interleave the clumps so insertion order gives no hint
    let points = [
        [0.0, 0.0],
        [50.0, 50.0],
        [0.5, 0.2],
        [50.3, 50.1],
        [0.2, 0.4],
        [50.1, 50.4],
    ];
    for p in &points {
        tree.insert(p)?;
    }

    assert_eq!(tree.stats().leaf_splits, 1);
    let root = tree.node(tree.root());
    assert_eq!(root.num_children(), 2);
    for &leaf in root.children() {
        let node = tree.node(leaf);
        assert_eq!(node.count(), 3);
        let near_origin: Vec<bool> = node
            .points()
            .iter()
            .map(|&id| tree.point(id).map_or(false, |p| p[0] < 10.0))
            .collect();
        assert!(
            near_origin.iter().all(|&b| b) || near_origin.iter().all(|&b| !b),
            "leaf {} mixes both clumps",
            leaf
        );
    }
    assert_valid(&tree);
    Ok(())
}

#[test]
fn test_r_star_reinserts_before_splitting() -> TreeResult<()> {
    let config = TreeConfig::builder()
        .leaf_size(2, 4)
        .split_policy(SplitPolicy::RStar)
        .build()?;
    assert_eq!(config.reinsert_count(), 1);
    let mut tree = RectangleTree::new(config)?;

    for p in [[0.0, 0.0], [0.1, 0.0], [0.0, 0.1], [0.1, 0.1]] {
        tree.insert(&p)?;
    }
    assert_eq!(tree.stats().forced_reinsertions, 0);
    tree.insert(&[10.0, 10.0])?;

    let stats = tree.stats();
    assert_eq!(stats.forced_reinsertions, 1);
    assert_eq!(stats.reinserted_points, 1);
    // The reinserted point lands back in the only leaf, which then splits
    assert_eq!(stats.leaf_splits, 1);
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.node(tree.root()).num_children(), 2);
    assert_valid(&tree);
    Ok(())
}

#[test]
fn test_reinsertion_fires_once_per_level_per_insert() -> TreeResult<()> {
    let mut tree = RectangleTree::new(small_config(SplitPolicy::RStar)?)?;
    let mut rng = seeded_rng(7);
    for p in random_points(&mut rng, 400, 2, 100.0) {
        let before = tree.stats().forced_reinsertions;
        let height = tree.height();
        tree.insert(&p)?;
        let fired = tree.stats().forced_reinsertions - before;
        // Only leaves are ever reinserted, so at most once per insert
        assert!(fired <= 1, "reinsertion fired {} times at height {}", fired, height);
    }
    assert!(tree.stats().forced_reinsertions > 0);
    assert_valid(&tree);
    Ok(())
}

#[test]
fn test_every_point_reachable_through_containing_bounds() -> TreeResult<()> {
    for policy in ALL_POLICIES {
        let mut tree = RectangleTree::new(small_config(policy)?)?;
        let mut rng = seeded_rng(11);
        let ids = random_points(&mut rng, 300, 2, 50.0)
            .iter()
            .map(|p| tree.insert(p))
            .collect::<TreeResult<Vec<_>>>()?;

        for id in ids {
            let path = tree.path_to(id).expect("point must be reachable");
            let point = tree.point(id).expect("point is live");
            assert_eq!(path.first(), Some(&tree.root()));
            assert_eq!(path.len(), tree.height() + 1);
            for pair in path.windows(2) {
                assert_eq!(tree.node(pair[1]).parent(), Some(pair[0]));
                assert!(tree.node(pair[0]).children().contains(&pair[1]));
            }
            for &node in &path {
                assert!(tree.node(node).bound().contains(point));
            }
            let leaf = tree.node(*path.last().unwrap());
            assert!(leaf.is_leaf());
            assert!(leaf.points().contains(&id));
        }
    }
    Ok(())
}

#[test]
fn test_r_star_remove_and_reinsert_preserves_point_set() -> TreeResult<()> {
    let mut tree = RectangleTree::new(small_config(SplitPolicy::RStar)?)?;
    let mut rng = seeded_rng(3);
    let ids = random_points(&mut rng, 200, 2, 10.0)
        .iter()
        .map(|p| tree.insert(p))
        .collect::<TreeResult<Vec<_>>>()?;
    assert!(tree.stats().forced_reinsertions > 0);

    for &id in ids.iter().step_by(17) {
        let before = coordinate_set(&tree);
        let coords = tree.point(id).expect("point is live").to_vec();
        assert!(tree.remove(id)?);
        let fresh = tree.insert(&coords)?;
        assert_ne!(fresh, id);
        assert_eq!(coordinate_set(&tree), before);
        assert_valid(&tree);
    }
    Ok(())
}
