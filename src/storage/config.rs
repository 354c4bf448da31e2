//! Extension settings and their TOML file.
//!
//! Holds the model API keys, developer mode, feature toggles and contrast
//! preferences. A missing file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ai::{SimplificationLevel, DEFAULT_API_URL, DEFAULT_MODEL};
use crate::contrast::{parse_color, DEFAULT_MIN_RATIO};

/// How contrast optimization treats the page's palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Keep existing hues, fix only failing pairs
    Maintain,
    /// Push colors further apart
    #[default]
    Enhance,
    /// Force maximum contrast
    Maximize,
}

impl std::fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorScheme::Maintain => write!(f, "Maintain"),
            ColorScheme::Enhance => write!(f, "Enhance"),
            ColorScheme::Maximize => write!(f, "Maximize"),
        }
    }
}

/// Where contrast fixes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastMode {
    /// Colors suggested by the hosted model
    #[default]
    Ai,
    /// Colors from the manual settings
    Manual,
}

impl std::fmt::Display for ContrastMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContrastMode::Ai => write!(f, "AI"),
            ContrastMode::Manual => write!(f, "Manual"),
        }
    }
}

/// API keys for hosted models.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    pub claude: Option<String>,
    pub gemini: Option<String>,
}

/// Hosted model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    /// Model identifier
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Reply token limit
    pub max_tokens: u32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_URL.to_string(),
            max_tokens: 4000,
        }
    }
}

/// Per-feature on/off switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureToggles {
    pub contrast_checker: bool,
    pub contrast_optimization: bool,
    pub alt_text: bool,
    pub simplify: bool,
    pub focus_mode: bool,
    pub website_theme: bool,
    pub text_to_speech: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            contrast_checker: true,
            contrast_optimization: false,
            alt_text: false,
            simplify: false,
            focus_mode: false,
            website_theme: false,
            text_to_speech: false,
        }
    }
}

/// Colors applied in manual contrast mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualColors {
    pub text_color: String,
    pub background_color: String,
    pub link_color: String,
    pub heading_color: String,
}

impl Default for ManualColors {
    fn default() -> Self {
        Self {
            text_color: "#000000".to_string(),
            background_color: "#FFFFFF".to_string(),
            link_color: "#0066CC".to_string(),
            heading_color: "#1A1A1A".to_string(),
        }
    }
}

/// Contrast optimization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContrastSettings {
    /// Minimum acceptable ratio (WCAG AA normal text is 4.5)
    pub min_contrast: f64,
    /// Apply fixes without confirmation
    pub auto_adjust: bool,
    pub color_scheme: ColorScheme,
    pub mode: ContrastMode,
    pub manual: ManualColors,
}

impl Default for ContrastSettings {
    fn default() -> Self {
        Self {
            min_contrast: DEFAULT_MIN_RATIO,
            auto_adjust: true,
            color_scheme: ColorScheme::Enhance,
            mode: ContrastMode::Ai,
            manual: ManualColors::default(),
        }
    }
}

/// Content simplification settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimplifySettings {
    pub level: SimplificationLevel,
}

/// Extension configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionConfig {
    /// Application version
    pub version: String,
    /// Show diagnostics and raw model replies
    #[serde(default)]
    pub developer_mode: bool,
    #[serde(default)]
    pub api_keys: ApiKeys,
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub features: FeatureToggles,
    #[serde(default)]
    pub contrast: ContrastSettings,
    #[serde(default)]
    pub simplify: SimplifySettings,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            developer_mode: false,
            api_keys: ApiKeys::default(),
            ai: AiSettings::default(),
            features: FeatureToggles::default(),
            contrast: ContrastSettings::default(),
            simplify: SimplifySettings::default(),
        }
    }
}

impl ExtensionConfig {
    /// Key the model client authenticates with, if one is set.
    ///
    /// The Gemini key is stored but no client uses it yet.
    pub fn model_api_key(&self) -> Option<&str> {
        self.api_keys
            .claude
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Whether the model client can be built from this config.
    pub fn has_api_key(&self) -> bool {
        self.model_api_key().is_some()
    }

    /// Check value ranges and manual colors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = self.contrast.min_contrast;
        if !(1.0..=21.0).contains(&min) {
            return Err(ConfigError::Invalid(format!(
                "min_contrast must be between 1 and 21, got {}",
                min
            )));
        }

        if self.ai.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be positive".to_string()));
        }

        let manual = &self.contrast.manual;
        for (name, value) in [
            ("text_color", &manual.text_color),
            ("background_color", &manual.background_color),
            ("link_color", &manual.link_color),
            ("heading_color", &manual.heading_color),
        ] {
            parse_color(value).map_err(|e| ConfigError::Invalid(format!("{}: {}", name, e)))?;
        }

        Ok(())
    }

    /// Same config with API keys masked, for display.
    pub fn redacted(&self) -> Self {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "********".to_string());
        Self {
            api_keys: ApiKeys {
                claude: mask(&self.api_keys.claude),
                gemini: mask(&self.api_keys.gemini),
            },
            ..self.clone()
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "a11ylens", "A11yLens")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load configuration from the default path.
pub fn load_config() -> Result<ExtensionConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Save configuration to the default path.
pub fn save_config(config: &ExtensionConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Load configuration from `path`, falling back to defaults when it is missing.
pub fn load_config_from(path: &Path) -> Result<ExtensionConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ExtensionConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let config: ExtensionConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.validate()?;
    Ok(config)
}

/// Save configuration to `path`, creating parent directories.
pub fn save_config_to(config: &ExtensionConfig, path: &Path) -> Result<(), ConfigError> {
    config.validate()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    tracing::info!("Saved config to {}", path.display());
    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
