//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use reqwest::Url;
use std::path::PathBuf;

use super::defaults::{MAX_HTTP_TIMEOUT_SECS, MAX_RATE_LIMIT_CAPACITY, MAX_RATE_LIMIT_WINDOW_MS};
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [scryfall] section
    if let Some(section) = ini.section(Some("scryfall")) {
        if let Some(v) = section.get("base_url") {
            config.scryfall.base_url = parse_url("scryfall", "base_url", v)?;
        }
        if let Some(v) = non_empty(section, "default_lang") {
            config.scryfall.default_lang = v.to_lowercase();
        }
        if let Some(v) = non_empty(section, "alternate_lang") {
            config.scryfall.alternate_lang = v.to_lowercase();
        }
    }

    // [yandex] section
    if let Some(section) = ini.section(Some("yandex")) {
        if let Some(v) = non_empty(section, "dictionary_key") {
            config.yandex.dictionary_key = Some(v.to_string());
        }
        if let Some(v) = non_empty(section, "iam_token") {
            config.yandex.iam_token = Some(v.to_string());
        }
        if let Some(v) = non_empty(section, "folder_id") {
            config.yandex.folder_id = Some(v.to_string());
        }
        if let Some(v) = section.get("dictionary_url") {
            config.yandex.dictionary_url = parse_url("yandex", "dictionary_url", v)?;
        }
        if let Some(v) = section.get("translate_url") {
            config.yandex.translate_url = parse_url("yandex", "translate_url", v)?;
        }
        if let Some(v) = non_empty(section, "source_lang") {
            config.yandex.source_lang = v.to_lowercase();
        }
        if let Some(v) = non_empty(section, "target_lang") {
            config.yandex.target_lang = v.to_lowercase();
        }
    }

    // [rate_limit] section
    if let Some(section) = ini.section(Some("rate_limit")) {
        if let Some(v) = section.get("capacity") {
            config.rate_limit.capacity =
                parse_bounded(v, MAX_RATE_LIMIT_CAPACITY).ok_or_else(|| invalid(
                    "rate_limit",
                    "capacity",
                    v,
                    &format!("must be an integer from 1 to {}", MAX_RATE_LIMIT_CAPACITY),
                ))?;
        }
        if let Some(v) = section.get("window_ms") {
            config.rate_limit.window_ms =
                parse_bounded(v, MAX_RATE_LIMIT_WINDOW_MS).ok_or_else(|| invalid(
                    "rate_limit",
                    "window_ms",
                    v,
                    &format!(
                        "must be a positive integer (milliseconds) up to {}",
                        MAX_RATE_LIMIT_WINDOW_MS
                    ),
                ))?;
        }
    }

    // [http] section
    if let Some(section) = ini.section(Some("http")) {
        if let Some(v) = section.get("timeout") {
            config.http.timeout =
                parse_bounded(v, MAX_HTTP_TIMEOUT_SECS).ok_or_else(|| invalid(
                    "http",
                    "timeout",
                    v,
                    &format!(
                        "must be a positive integer (seconds) up to {}",
                        MAX_HTTP_TIMEOUT_SECS
                    ),
                ))?;
        }
    }

    // [export] section
    if let Some(section) = ini.section(Some("export")) {
        if let Some(v) = non_empty(section, "deck_name") {
            config.export.deck_name = v.to_string();
        }
        if let Some(v) = non_empty(section, "output_dir") {
            config.export.output_dir = expand_tilde(v);
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

/// Returns the trimmed value of `key`, or `None` if it is missing or blank.
fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Parses an integer in `1..=max`.
fn parse_bounded<T>(value: &str, max: T) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    value
        .trim()
        .parse::<T>()
        .ok()
        .filter(|n| *n > T::default() && *n <= max)
}

fn parse_url(section: &str, key: &str, value: &str) -> Result<String, ConfigFileError> {
    let value = value.trim();
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value.to_string()),
        _ => Err(invalid(
            section,
            key,
            value,
            "must be an absolute http(s) URL",
        )),
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand `~/` at the start of a path to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
