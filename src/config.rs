use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::danbooru::DEFAULT_API_BASE_URL;
use crate::utils;

/// Number of analyses in one session after which the API usage advisory is shown
pub const API_REQUEST_WARNING_THRESHOLD: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_warning_threshold")]
    pub request_warning_threshold: u32,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout. Unset means the transport's own defaults apply
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enable")]
    pub enable: bool,
    #[serde(default = "default_logging_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_analyze")]
    pub analyze: String,
    #[serde(default = "default_copy")]
    pub copy: String,
    #[serde(default = "default_open_post")]
    pub open_post: String,
    #[serde(default = "default_toggle_focus")]
    pub toggle_focus: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_toggle_category")]
    pub toggle_category: String,
    #[serde(default = "default_category_left")]
    pub category_left: String,
    #[serde(default = "default_category_right")]
    pub category_right: String,
    #[serde(default = "default_dismiss")]
    pub dismiss: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_error")]
    pub error: String,
    #[serde(default = "default_warning")]
    pub warning: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_warning_threshold: default_request_warning_threshold(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable: default_logging_enable(),
            level: default_logging_level(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            analyze: default_analyze(),
            copy: default_copy(),
            open_post: default_open_post(),
            toggle_focus: default_toggle_focus(),
            help: default_help(),
            toggle_category: default_toggle_category(),
            category_left: default_category_left(),
            category_right: default_category_right(),
            dismiss: default_dismiss(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            accent: default_accent(),
            error: default_error(),
            warning: default_warning(),
        }
    }
}

impl Theme {
    /// Get preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert("default".to_string(), Theme::default());

        themes.insert("dark".to_string(), Theme {
            fg: "white".to_string(),
            bg: "black".to_string(),
            highlight_bg: "cyan".to_string(),
            highlight_fg: "black".to_string(),
            accent: "lightblue".to_string(),
            error: "lightred".to_string(),
            warning: "lightyellow".to_string(),
        });

        themes.insert("light".to_string(), Theme {
            fg: "black".to_string(),
            bg: "white".to_string(),
            highlight_bg: "blue".to_string(),
            highlight_fg: "white".to_string(),
            accent: "blue".to_string(),
            error: "red".to_string(),
            warning: "magenta".to_string(),
        });

        themes
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_warning_threshold() -> u32 {
    API_REQUEST_WARNING_THRESHOLD
}

fn default_user_agent() -> String {
    format!("dantags/{}", env!("CARGO_PKG_VERSION"))
}

fn default_logging_enable() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_analyze() -> String {
    "Enter".to_string()
}

fn default_copy() -> String {
    "c".to_string()
}

fn default_open_post() -> String {
    "o".to_string()
}

fn default_toggle_focus() -> String {
    "Tab".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_toggle_category() -> String {
    "Space".to_string()
}

fn default_category_left() -> String {
    "Left".to_string()
}

fn default_category_right() -> String {
    "Right".to_string()
}

fn default_dismiss() -> String {
    "Enter".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_accent() -> String {
    "cyan".to_string()
}

fn default_error() -> String {
    "red".to_string()
}

fn default_warning() -> String {
    "yellow".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid key binding for {action}: {reason}")]
    InvalidKeyBinding { action: &'static str, reason: String },
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

impl Config {
    /// Load configuration from an explicit path, or from the default location.
    /// A missing file yields the defaults; nothing is ever written back
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path()?,
        };

        if config_path.exists() {
            Self::from_file(&config_path)
        } else if path.is_some() {
            Err(ConfigError::ReadError(format!(
                "{} does not exist",
                config_path.display()
            )))
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir()
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// API base URL without a trailing slash
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_warning_threshold == 0 {
            return Err(ConfigError::InvalidSetting(
                "request_warning_threshold must be at least 1".to_string(),
            ));
        }
        if self.api_base_url().is_empty() {
            return Err(ConfigError::InvalidSetting("api_base_url is empty".to_string()));
        }

        let bindings = [
            ("quit", &self.key_bindings.quit),
            ("analyze", &self.key_bindings.analyze),
            ("copy", &self.key_bindings.copy),
            ("open_post", &self.key_bindings.open_post),
            ("toggle_focus", &self.key_bindings.toggle_focus),
            ("help", &self.key_bindings.help),
            ("toggle_category", &self.key_bindings.toggle_category),
            ("category_left", &self.key_bindings.category_left),
            ("category_right", &self.key_bindings.category_right),
            ("dismiss", &self.key_bindings.dismiss),
        ];
        for (action, binding) in bindings {
            utils::parse_key_binding(binding)
                .map_err(|reason| ConfigError::InvalidKeyBinding { action, reason })?;
        }

        Ok(())
    }

    /// Get the currently active theme
    pub fn get_active_theme(&self) -> Theme {
        if let Some(theme) = self.themes.get(&self.current_theme) {
            theme.clone()
        } else if let Some(theme) = Theme::get_preset_themes().get(&self.current_theme) {
            theme.clone()
        } else {
            Theme::default()
        }
    }
}
