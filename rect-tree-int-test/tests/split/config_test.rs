use rect_tree::{Metric, RectangleTree, SplitPolicy, TreeConfig, TreeError, TreeResult};

#[test]
fn test_config_from_json() -> TreeResult<()> {
    let json = r#"{
        "dimension": 3,
        "min_leaf_size": 4,
        "max_leaf_size": 10,
        "split_policy": "RStar",
        "metric": "Manhattan"
    }"#;
    let config: TreeConfig = serde_json::from_str(json).expect("valid json");
    assert_eq!(config.split_policy(), SplitPolicy::RStar);
    assert_eq!(config.metric(), Metric::Manhattan);
    assert_eq!(config.reinsert_count(), 3);

    let mut tree = RectangleTree::new(config)?;
    tree.insert(&[1.0, 2.0, 3.0])?;
    assert_eq!(tree.len(), 1);
    Ok(())
}

#[test]
fn test_infeasible_config_rejected_at_construction() {
    let config: TreeConfig =
        serde_json::from_str(r#"{"min_num_children": 4, "max_num_children": 5}"#)
            .expect("valid json");
    match RectangleTree::new(config) {
        Err(TreeError::InvalidConfiguration(msg)) => assert!(msg.contains("children")),
        other => panic!("expected a configuration error, got {:?}", other.map(|t| t.len())),
    }
}

#[test]
fn test_stats_serialize() -> TreeResult<()> {
    let config = TreeConfig::builder().leaf_size(2, 4).build()?;
    let tree = RectangleTree::with_points(config, (0..20).map(|i| [i as f64, 0.0]))?;
    let json = serde_json::to_value(tree.stats()).expect("stats serialize");
    assert_eq!(json["leaf_splits"], tree.stats().leaf_splits);
    assert!(json["root_promotions"].as_u64().unwrap_or(0) >= 1);
    Ok(())
}
