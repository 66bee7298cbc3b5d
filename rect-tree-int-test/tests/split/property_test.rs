use rand::Rng;
use rect_tree::{
    BoundingRectangle, PointId, Range, RectangleTree, SplitPolicy, TreeConfig, TreeResult,
};
use rect_tree_int_test::test_util::{
    assert_valid, clustered_points, random_points, seeded_rng, small_config, stored_ids,
    ALL_POLICIES,
};
use std::collections::HashSet;

#[test]
fn test_integrity_after_every_insert() -> TreeResult<()> {
    for policy in ALL_POLICIES {
        let mut tree = RectangleTree::new(small_config(policy)?)?;
        let mut rng = seeded_rng(1);
        for p in random_points(&mut rng, 250, 2, 100.0) {
            tree.insert(&p)?;
            assert_valid(&tree);
        }
        assert_eq!(tree.len(), 250);
        // X-tree supernodes may keep the directory flat
        let min_height = if policy == SplitPolicy::XTree { 1 } else { 2 };
        assert!(tree.height() >= min_height, "{} tree stayed shallow", policy);
    }
    Ok(())
}

#[test]
fn test_integrity_under_mixed_workload() -> TreeResult<()> {
    for policy in ALL_POLICIES {
        let mut tree = RectangleTree::new(small_config(policy)?)?;
        let mut rng = seeded_rng(2);
        let mut live: Vec<PointId> = Vec::new();

        for step in 0..600 {
            if live.is_empty() || rng.gen_bool(0.65) {
                let p = [rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)];
                live.push(tree.insert(&p)?);
            } else {
                let victim = live.swap_remove(rng.gen_range(0..live.len()));
                assert!(tree.remove(victim)?, "step {}: {} was not removed", step, victim);
            }
            assert_valid(&tree);
            assert_eq!(tree.len(), live.len());
        }

        let expected: HashSet<PointId> = live.iter().copied().collect();
        assert_eq!(stored_ids(&tree), expected);
    }
    Ok(())
}

#[test]
fn test_drain_to_empty() -> TreeResult<()> {
    for policy in ALL_POLICIES {
        let mut tree = RectangleTree::new(small_config(policy)?)?;
        let mut rng = seeded_rng(4);
        let mut ids = random_points(&mut rng, 150, 2, 20.0)
            .iter()
            .map(|p| tree.insert(p))
            .collect::<TreeResult<Vec<_>>>()?;

        // Remove in a scrambled order
        while !ids.is_empty() {
            let id = ids.swap_remove(rng.gen_range(0..ids.len()));
            tree.remove(id)?;
            assert_valid(&tree);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.node(tree.root()).is_leaf());
    }
    Ok(())
}

#[test]
fn test_find_within_matches_brute_force() -> TreeResult<()> {
    for policy in ALL_POLICIES {
        let mut tree = RectangleTree::new(small_config(policy)?)?;
        let mut rng = seeded_rng(5);
        let points = clustered_points(&mut rng, 6, 40, 2);
        let ids = points
            .iter()
            .map(|p| tree.insert(p))
            .collect::<TreeResult<Vec<_>>>()?;

        for _ in 0..25 {
            let x = rng.gen_range(0.0..1000.0);
            let y = rng.gen_range(0.0..1000.0);
            let query = BoundingRectangle::from_ranges(vec![
                Range::new(x, x + 200.0),
                Range::new(y, y + 200.0),
            ]);
            let mut expected: Vec<PointId> = ids
                .iter()
                .zip(&points)
                .filter(|(_, p)| query.contains(p))
                .map(|(&id, _)| id)
                .collect();
            expected.sort();
            assert_eq!(tree.find_within(&query)?, expected);
        }
    }
    Ok(())
}

#[test]
fn test_duplicate_points_split_degenerately() -> TreeResult<()> {
    for policy in ALL_POLICIES {
        let mut tree = RectangleTree::new(small_config(policy)?)?;
        for _ in 0..60 {
            tree.insert(&[3.0, 3.0])?;
        }
        assert_eq!(tree.len(), 60);
        assert_valid(&tree);
    }
    Ok(())
}

#[test]
fn test_higher_dimensions() -> TreeResult<()> {
    for policy in ALL_POLICIES {
        let config = TreeConfig::builder()
            .dimension(4)
            .leaf_size(3, 8)
            .num_children(2, 5)
            .split_policy(policy)
            .build()?;
        let mut tree = RectangleTree::new(config)?;
        let mut rng = seeded_rng(6);
        for p in random_points(&mut rng, 400, 4, 1.0) {
            tree.insert(&p)?;
        }
        assert_valid(&tree);
        assert_eq!(stored_ids(&tree).len(), 400);
    }
    Ok(())
}
