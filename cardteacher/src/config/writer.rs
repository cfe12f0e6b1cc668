//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let dictionary_key = config.yandex.dictionary_key.as_deref().unwrap_or("");
    let iam_token = config.yandex.iam_token.as_deref().unwrap_or("");
    let folder_id = config.yandex.folder_id.as_deref().unwrap_or("");

    format!(
        r#"[scryfall]
; Card database API
base_url = {}
; Language of the primary printing; lookup words come from its text
default_lang = {}
; Language of the localized printing
alternate_lang = {}

[yandex]
; Dictionary API key
; Get one at: https://yandex.com/dev/dictionary/
dictionary_key = {}
; IAM token for the translation API (sent as a Bearer token)
iam_token = {}
; Cloud folder ID the translation API bills to
folder_id = {}
dictionary_url = {}
translate_url = {}
; Language pair for dictionary lookups and translations
source_lang = {}
target_lang = {}

[rate_limit]
; Dictionary and translation calls allowed per window (shared by both services)
capacity = {}
; Window length in milliseconds
window_ms = {}

[http]
; Timeout in seconds for HTTP requests
timeout = {}

[export]
; Anki deck name, also used for the output file name
deck_name = {}
; Directory the Anki import file is written to
output_dir = {}

[logging]
; Log file location
file = {}
"#,
        config.scryfall.base_url,
        config.scryfall.default_lang,
        config.scryfall.alternate_lang,
        dictionary_key,
        iam_token,
        folder_id,
        config.yandex.dictionary_url,
        config.yandex.translate_url,
        config.yandex.source_lang,
        config.yandex.target_lang,
        config.rate_limit.capacity,
        config.rate_limit.window_ms,
        config.http.timeout,
        config.export.deck_name,
        path_to_string(&config.export.output_dir),
        path_to_string(&config.logging.file),
    )
}

/// Converts a path to a string, abbreviating the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_default_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let config = ConfigFile::default();
        config.save_to(&config_path).unwrap();

        assert_eq!(ConfigFile::load_from(&config_path).unwrap(), config);
    }

    #[test]
    fn test_credentials_and_custom_values_persist() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.yandex.dictionary_key = Some("dict.1.1.key".to_string());
        config.yandex.iam_token = Some("t1.token".to_string());
        config.yandex.folder_id = Some("b1gfolder".to_string());
        config.rate_limit.capacity = 10;
        config.export.deck_name = "Pauper Cube".to_string();
        config.export.output_dir = PathBuf::from("/tmp/anki");
        config.save_to(&config_path).unwrap();

        let loaded = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_output_is_commented() {
        let content = to_config_string(&ConfigFile::default());

        assert!(content.contains("[rate_limit]\n"));
        assert!(content.contains("capacity = 20\n"));
        assert!(content.contains("; Dictionary API key\n"));
        assert!(content.contains("dictionary_key = \n"));
    }

    #[test]
    fn test_home_paths_abbreviated() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path_to_string(&home.join("decks")), "~/decks");
        }
        assert_eq!(path_to_string(Path::new("/opt/decks")), "/opt/decks");
    }
}
