use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Environment variable overriding the data directory when the config leaves it unset.
pub const DATA_HOME_ENV: &str = "FINANCE_TRACKER_HOME";
const DATA_DIR_NAME: &str = ".finance_tracker";

/// Keys accepted by [`Config::set`].
pub const CONFIG_KEYS: [&str; 5] = ["locale", "currency", "default-user", "log-filter", "data-root"];

/// Languages written with a decimal comma.
const DECIMAL_COMMA_LANGUAGES: [&str; 12] = [
    "de", "es", "fr", "it", "nl", "pt", "pl", "ru", "sv", "da", "fi", "tr",
];

/// User preferences for the tracker CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    /// Label printed next to amounts. Purely cosmetic.
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<String>,
    /// `tracing` filter directives used when `RUST_LOG` is not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            data_root: None,
            default_user: None,
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_currency() -> String {
        "USD".into()
    }

    /// Data directory: the configured root, else `$FINANCE_TRACKER_HOME`,
    /// else `~/.finance_tracker`.
    pub fn resolve_data_root(&self) -> PathBuf {
        let env_value = std::env::var_os(DATA_HOME_ENV).map(PathBuf::from);
        self.resolve_data_root_with(env_value.as_deref())
    }

    pub fn resolve_data_root_with(&self, env_value: Option<&Path>) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }
        if let Some(path) = env_value.filter(|path| !path.as_os_str().is_empty()) {
            return path.to_path_buf();
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME)
    }

    /// Decimal separator for amounts, from the language part of `locale`.
    pub fn decimal_separator(&self) -> char {
        let language = self
            .locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if DECIMAL_COMMA_LANGUAGES.contains(&language.as_str()) {
            ','
        } else {
            '.'
        }
    }

    /// Updates one setting from its CLI spelling. A blank value clears the
    /// optional settings; `locale` and `currency` must not be blank.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional = (!value.is_empty()).then(|| value.to_string());
        match key.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "locale" => self.locale = required(key, value)?,
            "currency" => self.currency = required(key, value)?,
            "default-user" => self.default_user = optional,
            "log-filter" => self.log_filter = optional,
            "data-root" => self.data_root = optional.map(PathBuf::from),
            _ => {
                return Err(ConfigError::InvalidSetting(format!(
                    "unknown key `{key}`; expected one of {}",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Scope to open when no user is given on the command line.
    pub fn user_scope(&self) -> Option<&str> {
        self.default_user
            .as_deref()
            .map(str::trim)
            .filter(|user| !user.is_empty())
    }
}

fn required(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidSetting(format!("`{key}` must not be blank")));
    }
    Ok(value.to_string())
}
