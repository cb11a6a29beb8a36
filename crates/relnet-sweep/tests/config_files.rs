use relnet_sweep::NetworkConfig;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_json_config() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "cost_by_node_type": {{"0": 5.0, "1": 12.0, "2": 30.0}},
            "reliability_by_node_type": {{"0": 0.6, "1": 0.7, "2": 0.8}},
            "link_cost": 10.0
        }}"#
    )
    .unwrap();

    let config = NetworkConfig::load(file.path()).unwrap();
    assert_eq!(
        config,
        NetworkConfig::from_slices(&[5.0, 12.0, 30.0], &[0.6, 0.7, 0.8], 10.0)
    );
    let catalog = config.catalog().unwrap();
    assert_eq!(catalog.len(), 3);
}

#[test]
fn test_gapped_type_indices_are_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "cost_by_node_type": {{"0": 5.0, "2": 30.0}},
            "reliability_by_node_type": {{"0": 0.6, "2": 0.8}},
            "link_cost": 10.0
        }}"#
    )
    .unwrap();

    let config = NetworkConfig::load(file.path()).unwrap();
    assert_eq!(config.catalog().unwrap_err().code(), "INPUT_CATALOG");
}

#[test]
fn test_malformed_and_missing_files() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{\"link_cost\": 3.0}}").unwrap();
    let err = NetworkConfig::load(file.path()).unwrap_err();
    assert_eq!(err.code(), "CONFIG_PARSE");

    let dir = tempfile::tempdir().unwrap();
    let err = NetworkConfig::load(&dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.code(), "CONFIG_IO");
    assert!(err.to_string().starts_with("[CONFIG_IO]"));
}
