//! Integration tests for configuration management

use docpress::config::{Config, ConfigOverrides};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.paths.out_dir.is_empty(),
        "Default out_dir should not be empty"
    );
    assert!(
        !config.paths.work_dir.is_empty(),
        "Default work_dir should not be empty"
    );
    assert!(!config.graphviz.keep_diagrams);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
out_dir = "./docs"
work_dir = "./build"

[graphviz]
binary = "/opt/graphviz/bin/dot"
search_dirs = ["/usr/local/graphviz/bin"]
keep_diagrams = true
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.out_dir, "./docs");
    assert_eq!(config.paths.work_dir, "./build");
    assert_eq!(config.graphviz.binary, "/opt/graphviz/bin/dot");
    assert_eq!(config.graphviz.search_dirs, vec!["/usr/local/graphviz/bin"]);
    assert!(config.graphviz.keep_diagrams);
}

#[test]
fn test_config_from_toml_partial() {
    // Missing sections and fields use serde defaults
    let toml_str = r#"
[logging]
level = "error"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.paths.out_dir, "");
    assert!(config.graphviz.search_dirs.is_empty());
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$DOCPRESS/test.log"

[paths]
work_dir = "$DOCPRESS/work"

[graphviz]
search_dirs = ["$DOCPRESS/graphviz"]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("docpress"));
    assert!(!config.logging.file.contains("$DOCPRESS"));
    assert!(!config.paths.work_dir.contains("$DOCPRESS"));
    assert!(config.graphviz.search_dirs[0].ends_with("graphviz"));
    assert!(!config.graphviz.search_dirs[0].contains("$DOCPRESS"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert_eq!(config.get("verbose").unwrap(), "true");
    assert!(config.logging.verbose);

    config.set("out-dir", "docs").expect("Failed to set out-dir");
    assert_eq!(config.get("out_dir").unwrap(), "docs");

    config
        .set("search_dirs", "/a, /b,,")
        .expect("Failed to set search_dirs");
    assert_eq!(config.graphviz.search_dirs, vec!["/a", "/b"]);
    assert_eq!(config.get("search-dirs").unwrap(), "/a,/b");

    assert!(config.set("keep_diagrams", "maybe").is_err());

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "error").expect("Failed to set level");
    config.set("dot", "/custom/dot").expect("Failed to set dot");
    config
        .set("keep_diagrams", "true")
        .expect("Failed to set keep_diagrams");

    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    config.unset("dot", &defaults).expect("Failed to unset dot");
    config
        .unset("keep-diagrams", &defaults)
        .expect("Failed to unset keep-diagrams");

    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.graphviz.binary, defaults.graphviz.binary);
    assert_eq!(config.graphviz.keep_diagrams, defaults.graphviz.keep_diagrams);
    assert!(config.unset("unknown_key", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config
        .set("search_dirs", "/opt/graphviz/bin")
        .expect("Failed to set search_dirs");

    // Manually save to our test location
    if let Some(parent) = config_file.parent() {
        fs::create_dir_all(parent).expect("Failed to create dir");
    }
    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded_config = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded_config.logging.level, "info");
    assert_eq!(loaded_config.graphviz.search_dirs, vec!["/opt/graphviz/bin"]);
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        out_dir: Some("./custom_out".to_string()),
        work_dir: Some("./custom_work".to_string()),
        dot: Some("/custom/dot".to_string()),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.out_dir, "./custom_out");
    assert_eq!(config.paths.work_dir, "./custom_work");
    assert_eq!(config.graphviz.binary, "/custom/dot");
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.paths.out_dir, defaults.paths.out_dir);
    assert_eq!(config.graphviz.binary, defaults.graphviz.binary);
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[graphviz]"));

    assert!(display_str.contains("level"));
    assert!(display_str.contains("out_dir"));
    assert!(display_str.contains("keep_diagrams"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"
file = ""
verbose = false

[paths]
out_dir = ""
work_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    let changed = config.merge_defaults(&defaults);

    assert!(
        changed,
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.paths.out_dir, defaults.paths.out_dir);
    assert_eq!(config.paths.work_dir, defaults.paths.work_dir);
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"
verbose = false

[paths]
out_dir = "/my/docs"
work_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.paths.out_dir, "/my/docs");
}

#[test]
fn test_get_docpress_dir() {
    let dir = Config::get_docpress_dir();

    assert!(dir.to_string_lossy().contains("docpress"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
