use anyhow::Result;
use std::env;
use tempfile::tempdir;

use rinkplan::config::Config;

// Single test so the RINKPLAN_CONFIG_DIR override cannot race a parallel
// test in the same binary.
#[test]
fn test_config_file_lifecycle() -> Result<()> {
    let dir = tempdir()?;
    env::set_var("RINKPLAN_CONFIG_DIR", dir.path());

    // Missing file falls back to defaults
    let config = Config::load()?;
    assert_eq!(config.api.base_url, "http://localhost:3000");

    // Saved values come back on the next load
    let mut config = Config::default();
    config.api.base_url = "http://rink.local:8080".to_string();
    config.api.timeout_seconds = 5;
    config.save()?;

    let loaded = Config::load()?;
    assert_eq!(loaded.api.base_url, "http://rink.local:8080");
    assert_eq!(loaded.api.timeout_seconds, 5);
    assert_eq!(loaded.display.date_format, "%Y-%m-%d");

    env::remove_var("RINKPLAN_CONFIG_DIR");
    Ok(())
}
