//! Unit tests for configuration and root folder resolution
//!
//! Note: Uses serial_test to prevent ENV variable race conditions. Tests
//! that manipulate MOVIWEB_ROOT_FOLDER are marked with #[serial] to ensure
//! they run sequentially, not in parallel.

use moviweb_common::config::{
    resolve_omdb_api_key, resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[test]
#[serial]
fn test_cli_argument_has_highest_priority() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/from-env");
    let config = TomlConfig {
        root_folder: Some("/tmp/from-toml".to_string()),
        omdb_api_key: None,
    };

    let resolved = resolve_root_folder(Some(Path::new("/tmp/from-cli")), &config);
    assert_eq!(resolved, PathBuf::from("/tmp/from-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/from-env");
    let config = TomlConfig {
        root_folder: Some("/tmp/from-toml".to_string()),
        omdb_api_key: None,
    };

    let resolved = resolve_root_folder(None, &config);
    assert_eq!(resolved, PathBuf::from("/tmp/from-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_when_no_overrides() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some("/tmp/from-toml".to_string()),
        omdb_api_key: None,
    };

    let resolved = resolve_root_folder(None, &config);
    assert_eq!(resolved, PathBuf::from("/tmp/from-toml"));
}

#[test]
#[serial]
fn test_default_when_nothing_configured() {
    env::remove_var(ROOT_FOLDER_ENV);
    let resolved = resolve_root_folder(None, &TomlConfig::default());

    assert!(!resolved.as_os_str().is_empty());
    assert!(resolved.to_string_lossy().contains("moviweb"));
}

#[test]
#[serial]
fn test_empty_env_var_is_ignored() {
    env::set_var(ROOT_FOLDER_ENV, "  ");
    let resolved = resolve_root_folder(None, &TomlConfig::default());
    assert!(resolved.to_string_lossy().contains("moviweb"));
    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
fn test_toml_config_parses_known_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "root_folder = \"/srv/moviweb\"\nomdb_api_key = \"abc123\"\n",
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.root_folder.as_deref(), Some("/srv/moviweb"));
    assert_eq!(config.omdb_api_key.as_deref(), Some("abc123"));
}

#[test]
fn test_toml_config_missing_file_errors() {
    let result = TomlConfig::load(Path::new("/nonexistent/moviweb/config.toml"));
    assert!(result.is_err());
}

#[test]
fn test_omdb_key_cli_beats_toml() {
    let config = TomlConfig {
        root_folder: None,
        omdb_api_key: Some("toml-key".to_string()),
    };

    assert_eq!(
        resolve_omdb_api_key(Some("cli-key"), &config).as_deref(),
        Some("cli-key")
    );
    assert_eq!(resolve_omdb_api_key(None, &config).as_deref(), Some("toml-key"));
    assert_eq!(resolve_omdb_api_key(Some("   "), &config).as_deref(), Some("toml-key"));
    assert_eq!(resolve_omdb_api_key(None, &TomlConfig::default()), None);
}
