//! Storage module for configuration.

pub mod config;

pub use config::{
    get_config_path, load_config, load_config_from, save_config, save_config_to, AiSettings,
    ApiKeys, ColorScheme, ConfigError, ContrastMode, ContrastSettings, ExtensionConfig,
    FeatureToggles, ManualColors, SimplifySettings,
};
