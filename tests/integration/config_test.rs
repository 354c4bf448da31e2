//! Integration tests for configuration persistence.

use a11ylens::ai::SimplificationLevel;
use a11ylens::storage::{
    load_config_from, save_config_to, ColorScheme, ConfigError, ContrastMode, ExtensionConfig,
};
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_config_from(&dir.path().join("config.toml")).unwrap();

    assert!(!config.developer_mode);
    assert!(!config.has_api_key());
    assert_eq!(config.contrast.min_contrast, 4.5);
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = ExtensionConfig::default();
    config.developer_mode = true;
    config.api_keys.claude = Some("sk-test".to_string());
    config.contrast.min_contrast = 7.0;
    config.contrast.color_scheme = ColorScheme::Maximize;
    config.contrast.mode = ContrastMode::Manual;
    config.contrast.manual.link_color = "rgb(0, 0, 238)".to_string();
    config.simplify.level = SimplificationLevel::Strong;
    config.features.focus_mode = true;

    save_config_to(&config, &path).unwrap();
    let loaded = load_config_from(&path).unwrap();

    assert!(loaded.developer_mode);
    assert_eq!(loaded.api_keys.claude.as_deref(), Some("sk-test"));
    assert_eq!(loaded.api_keys.gemini, None);
    assert_eq!(loaded.contrast.min_contrast, 7.0);
    assert_eq!(loaded.contrast.color_scheme, ColorScheme::Maximize);
    assert_eq!(loaded.contrast.mode, ContrastMode::Manual);
    assert_eq!(loaded.contrast.manual.link_color, "rgb(0, 0, 238)");
    assert_eq!(loaded.simplify.level, SimplificationLevel::Strong);
    assert!(loaded.features.focus_mode);
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    std::fs::write(&path, "version = ").unwrap();
    assert!(matches!(load_config_from(&path), Err(ConfigError::ParseError(_))));

    std::fs::write(&path, "version = \"0.1.0\"\n[contrast]\nmin_contrast = 30.0\nauto_adjust = true\ncolor_scheme = \"enhance\"\nmode = \"ai\"\n[contrast.manual]\ntext_color = \"#000000\"\nbackground_color = \"#FFFFFF\"\nlink_color = \"#0066CC\"\nheading_color = \"#1A1A1A\"\n").unwrap();
    assert!(matches!(load_config_from(&path), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_invalid_config_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = ExtensionConfig::default();
    config.contrast.manual.text_color = "#abc".to_string();

    assert!(save_config_to(&config, &path).is_err());
    assert!(!path.exists());
}
