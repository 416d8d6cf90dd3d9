//! Tests to ensure configuration errors are actionable.
//!
//! `run` validates before touching the database or the network, so an invalid
//! configuration must fail without creating anything.

use node_globe::{run, Config};
use tempfile::TempDir;

#[test]
fn test_config_validation_errors_are_descriptive() {
    let mut config = Config::default();
    config.seeds.clear();
    let e = config.validate().unwrap_err();
    assert_eq!(e.field, "seeds");
    assert!(e.message.contains("at least one"));

    let mut config = Config::default();
    config.seeds.push("   ".to_string());
    assert_eq!(config.validate().unwrap_err().field, "seeds");

    let config = Config {
        port: 0,
        ..Default::default()
    };
    let e = config.validate().unwrap_err();
    assert_eq!(e.field, "port");
    assert!(e.message.contains("greater than 0"));

    let config = Config {
        geo_base_url: "ftp://ip-api.com".to_string(),
        ..Default::default()
    };
    let e = config.validate().unwrap_err();
    assert_eq!(e.field, "geo_base_url");
    assert!(e.message.contains("ftp"));

    let config = Config {
        sample: Some(0),
        ..Default::default()
    };
    assert_eq!(config.validate().unwrap_err().field, "sample");
}

#[test]
fn test_default_config_is_valid() {
    assert!(Config::default().validate().is_ok());
}

#[tokio::test]
async fn test_invalid_config_fails_before_creating_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nodes.db");
    let config = Config {
        db_path: db_path.clone(),
        seeds: Vec::new(),
        ..Default::default()
    };

    let err = run(config).await.unwrap_err();

    assert!(format!("{err:#}").contains("seeds"));
    assert!(!db_path.exists());
}
