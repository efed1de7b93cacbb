//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;
use std::time::Duration;

use serde::Deserialize;

use crate::locate::WordRules;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub suggest: SuggestSettings,
    pub words: WordRules,
    pub dictionary: DictionarySettings,
    pub fields: FieldSettings,
}

/// Which unmodified keystrokes schedule a re-query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerClass {
    /// ASCII letters, hyphen, space and backspace.
    Standard,
    /// ASCII letters and hyphen.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackoffKind {
    Fixed,
    Linear,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestSettings {
    pub delay_ms: u64,
    pub max_results: usize,
    pub trigger: TriggerClass,
}

impl SuggestSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictionarySettings {
    pub path: String,
    pub default_weight: f64,
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub backoff: BackoffKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSettings {
    pub ids: Vec<String>,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive!(suggest.max_results);
    check_positive!(dictionary.max_attempts);

    let w = s.dictionary.default_weight;
    if !w.is_finite() || w < 0.0 {
        return Err(SettingsError::InvalidValue {
            field: "dictionary.default_weight".to_string(),
            reason: "must be a finite, non-negative number".to_string(),
        });
    }

    if s.dictionary.path.trim().is_empty() {
        return Err(SettingsError::InvalidValue {
            field: "dictionary.path".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if let Some(c) = s.words.opening.iter().find(|c| s.words.delimiters.contains(*c)) {
        return Err(SettingsError::InvalidValue {
            field: "words.opening".to_string(),
            reason: format!("{c:?} is also a delimiter"),
        });
    }

    Ok(())
}
