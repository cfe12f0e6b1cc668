//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::provider::{DEFAULT_DICTIONARY_URL, DEFAULT_SCRYFALL_URL, DEFAULT_TRANSLATE_URL};

// =============================================================================
// Language defaults
// =============================================================================

/// Language of the primary printing and of dictionary lookups.
pub const DEFAULT_SOURCE_LANG: &str = "en";

/// Language of the localized printing and of translations.
pub const DEFAULT_TARGET_LANG: &str = "ru";

// =============================================================================
// Rate limit defaults
// =============================================================================

/// Dictionary plus translation calls allowed per window.
pub const DEFAULT_RATE_LIMIT_CAPACITY: usize = 20;

/// Rate limit window in milliseconds.
pub const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 1000;

/// Largest accepted `rate_limit.capacity`.
pub const MAX_RATE_LIMIT_CAPACITY: usize = 10_000;

/// Largest accepted `rate_limit.window_ms` (one hour).
pub const MAX_RATE_LIMIT_WINDOW_MS: u64 = 3_600_000;

// =============================================================================
// HTTP defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Largest accepted `http.timeout` in seconds.
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 3600;

// =============================================================================
// Export defaults
// =============================================================================

/// Default Anki deck name.
pub const DEFAULT_DECK_NAME: &str = "MTG Cards";

// =============================================================================
// ConfigFile::default()
// =============================================================================

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            scryfall: ScryfallSettings {
                base_url: DEFAULT_SCRYFALL_URL.to_string(),
                default_lang: DEFAULT_SOURCE_LANG.to_string(),
                alternate_lang: DEFAULT_TARGET_LANG.to_string(),
            },
            yandex: YandexSettings {
                dictionary_key: None,
                iam_token: None,
                folder_id: None,
                dictionary_url: DEFAULT_DICTIONARY_URL.to_string(),
                translate_url: DEFAULT_TRANSLATE_URL.to_string(),
                source_lang: DEFAULT_SOURCE_LANG.to_string(),
                target_lang: DEFAULT_TARGET_LANG.to_string(),
            },
            rate_limit: RateLimitSettings {
                capacity: DEFAULT_RATE_LIMIT_CAPACITY,
                window_ms: DEFAULT_RATE_LIMIT_WINDOW_MS,
            },
            http: HttpSettings {
                timeout: DEFAULT_HTTP_TIMEOUT_SECS,
            },
            export: ExportSettings {
                deck_name: DEFAULT_DECK_NAME.to_string(),
                output_dir: PathBuf::from("."),
            },
            logging: LoggingSettings {
                file: config_dir.join("cardteacher.log"),
            },
        }
    }
}
