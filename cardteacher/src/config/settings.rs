//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;
use std::time::Duration;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Card database settings
    pub scryfall: ScryfallSettings,
    /// Dictionary and translation service settings
    pub yandex: YandexSettings,
    /// Rate limit for dictionary and translation calls
    pub rate_limit: RateLimitSettings,
    /// HTTP client settings
    pub http: HttpSettings,
    /// Export settings
    pub export: ExportSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Card database configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScryfallSettings {
    /// API base URL
    pub base_url: String,
    /// Language of the primary printing (lookup keys come from it)
    pub default_lang: String,
    /// Language of the localized printing
    pub alternate_lang: String,
}

/// Dictionary and translation service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct YandexSettings {
    /// Dictionary API key
    pub dictionary_key: Option<String>,
    /// IAM token for the translation API
    pub iam_token: Option<String>,
    /// Cloud folder the translation API bills to
    pub folder_id: Option<String>,
    /// Dictionary API base URL
    pub dictionary_url: String,
    /// Translation API base URL
    pub translate_url: String,
    /// Language words are looked up in
    pub source_lang: String,
    /// Language words are translated to
    pub target_lang: String,
}

impl YandexSettings {
    /// Returns the keys of credentials that are not set.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("dictionary_key", &self.dictionary_key),
            ("iam_token", &self.iam_token),
            ("folder_id", &self.folder_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| key)
        .collect()
    }
}

/// Rate limit configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitSettings {
    /// Calls allowed per window
    pub capacity: usize,
    /// Window length in milliseconds
    pub window_ms: u64,
}

impl RateLimitSettings {
    /// Returns the window as a `Duration`.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    /// Timeout in seconds for HTTP requests.
    pub timeout: u64,
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Anki deck name
    pub deck_name: String,
    /// Directory the export file is written to
    pub output_dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
