//! Deck list parsing.
//!
//! Reads the plain-text export format used by deck builders:
//!
//! ```text
//! Deck
//! 4 Lightning Bolt
//! 20 Mountain
//!
//! Sideboard
//! 2 Smash to Smithereens
//! ```
//!
//! Each line is lowercased; blank lines and the `deck` / `sideboard` section
//! markers are skipped; `<quantity> <name>` is reduced to `<name>`.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

const DECK_MARKER: &str = "deck";
const SIDEBOARD_MARKER: &str = "sideboard";

/// Errors that can occur while reading a deck list.
#[derive(Debug, Error)]
pub enum DeckListError {
    /// Failed to read the list file
    #[error("Failed to read deck list '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Matches `<quantity><whitespace><name>`.
///
/// The name runs while it consists of word characters and whitespace, so
/// trailing set codes like `(M21) 264` are cut off.
fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\s([\w\s]+)").expect("valid deck line pattern"))
}

/// Parses one line into a card name.
///
/// Returns `None` for blank lines, section markers and lines that do not
/// start with a quantity.
pub fn parse_line(line: &str) -> Option<String> {
    let line = line.trim().to_lowercase();

    if line.is_empty() || line == DECK_MARKER || line == SIDEBOARD_MARKER {
        return None;
    }

    match line_pattern().captures(&line) {
        Some(captures) => {
            let name = captures[1].trim();
            (!name.is_empty()).then(|| name.to_string())
        }
        None => {
            warn!(line = %line, "Skipping unrecognized deck list line");
            None
        }
    }
}

/// Parses a deck list into card names, in file order.
///
/// Repeated cards (main deck and sideboard) are kept; the lookup cache
/// deduplicates the work.
pub fn parse_deck_list(text: &str) -> Vec<String> {
    let names: Vec<String> = text.lines().filter_map(parse_line).collect();
    debug!(cards = names.len(), "Parsed deck list");
    names
}

/// Reads and parses a deck list file.
pub fn parse_deck_file(path: &Path) -> Result<Vec<String>, DeckListError> {
    let text = std::fs::read_to_string(path).map_err(|source| DeckListError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_deck_list(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_line_strips_quantity() {
        assert_eq!(parse_line("4 Lightning Bolt"), Some("lightning bolt".to_string()));
        assert_eq!(parse_line("20 Mountain"), Some("mountain".to_string()));
    }

    #[test]
    fn test_section_markers_and_blanks_skipped() {
        assert_eq!(parse_line("Deck"), None);
        assert_eq!(parse_line("SIDEBOARD"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn test_trailing_set_code_cut_off() {
        assert_eq!(
            parse_line("1 Llanowar Elves (M19) 314"),
            Some("llanowar elves".to_string())
        );
    }

    #[test]
    fn test_line_without_quantity_skipped() {
        assert_eq!(parse_line("Lightning Bolt"), None);
        assert_eq!(parse_line("// comment"), None);
    }

    #[test]
    fn test_punctuated_name_truncated_at_punctuation() {
        assert_eq!(
            parse_line("1 Jace, the Mind Sculptor"),
            Some("jace".to_string())
        );
    }

    #[test]
    fn test_parse_deck_list_keeps_order_and_repeats() {
        let text = "Deck\n4 Lightning Bolt\n20 Mountain\n\nSideboard\n2 Lightning Bolt\n";
        assert_eq!(
            parse_deck_list(text),
            vec!["lightning bolt", "mountain", "lightning bolt"]
        );
    }

    #[test]
    fn test_parse_deck_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deck.txt");
        std::fs::write(&path, "Deck\r\n1 Island\r\n1 Forest\r\n").unwrap();

        let names = parse_deck_file(&path).unwrap();
        assert_eq!(names, vec!["island", "forest"]);
    }

    #[test]
    fn test_parse_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = parse_deck_file(&temp_dir.path().join("missing.txt"));
        assert!(matches!(result, Err(DeckListError::Read { .. })));
    }
}
