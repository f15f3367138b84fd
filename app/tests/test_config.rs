//! FILENAME: tests/test_config.rs
//! Integration tests for configuration loading.

mod common;

use std::io::Write;
use std::path::Path;

use common::TestHarness;
use dashboard_lib::{commands, ConfigError, DashboardConfig, ScreenKind};

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "screens": {{ "pageSize": 3, "anchorDate": "2024-03-10" }} }}"#).unwrap();

    let config = DashboardConfig::load(file.path()).unwrap();
    assert_eq!(config.screens.page_size, 3);

    let harness = TestHarness::with_config(config);
    let snapshot = commands::get_screen(&harness.state, ScreenKind::Apparel).unwrap();
    assert_eq!(snapshot.rows.len(), 3);
    assert_eq!(snapshot.page.map(|p| p.total_pages), Some(3));
}

#[test]
fn test_missing_file() {
    let result = DashboardConfig::load(Path::new("/definitely/not/here/dashboard.json"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_lenient_policy_from_config() {
    let json = r#"{"engine": {"aggregationPolicy": "lenient"}}"#;
    let config = DashboardConfig::from_json_str(json).unwrap();
    assert_eq!(config.engine.policy(), view_engine::AggregationPolicy::Lenient);
}
