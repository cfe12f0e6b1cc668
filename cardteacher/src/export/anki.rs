//! Anki plain-text export.
//!
//! Output layout:
//!
//! ```text
//! #separator:tab
//! #html:true
//! #deck:MTG Cards
//! #columns:English	Russian	Examples
//! enter	входить	</br>(verb) входить<br/>ˈentə<br/><small>Пример: ...</small><br/>
//! ```
//!
//! One note per word entry of every card, in card order. Words without a
//! translation are skipped.

use std::path::{Path, PathBuf};
use tracing::info;

use super::{ExportError, ExportWriter};
use crate::orchestrator::BatchResult;
use crate::pipeline::{CardData, WordEntry};
use crate::provider::{DictionaryEntry, TextItem};

/// Field names, front to back.
pub const NOTE_COLUMNS: [&str; 3] = ["English", "Russian", "Examples"];

const EMPTY_EXAMPLES: &str = "---";
const MAX_EXAMPLES: usize = 2;
const MAX_SYNONYMS: usize = 2;

/// Writes a batch as an Anki import file.
#[derive(Debug, Clone)]
pub struct AnkiTextExporter {
    path: PathBuf,
    deck_name: String,
}

impl AnkiTextExporter {
    /// Creates an exporter writing to `path`.
    pub fn new(path: impl Into<PathBuf>, deck_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            deck_name: deck_name.into(),
        }
    }

    /// Creates an exporter writing `<deck name>.txt` inside `directory`.
    pub fn in_directory(directory: &Path, deck_name: impl Into<String>) -> Self {
        let deck_name = deck_name.into();
        let file_name = format!("{}.txt", deck_name.replace(|c: char| c == '/' || c == '\\', "_"));
        Self::new(directory.join(file_name), deck_name)
    }

    /// Returns the output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the deck name written into the header.
    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    /// Renders the file content for `cards`.
    pub fn render(&self, cards: &[CardData]) -> String {
        let mut text = format_header(&self.deck_name);
        for note in notes(cards) {
            text.push_str(&note);
            text.push('\n');
        }
        text
    }
}

impl ExportWriter for AnkiTextExporter {
    fn write(&self, result: &BatchResult) -> Result<(), ExportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ExportError::DirectoryError {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let content = self.render(&result.cards);
        let note_count = content.lines().filter(|l| !l.starts_with('#')).count();

        std::fs::write(&self.path, content).map_err(|source| ExportError::WriteError {
            path: self.path.display().to_string(),
            source,
        })?;

        info!(
            path = %self.path.display(),
            deck = %self.deck_name,
            cards = result.cards.len(),
            notes = note_count,
            "Wrote Anki import file"
        );
        Ok(())
    }
}

fn notes(cards: &[CardData]) -> impl Iterator<Item = String> + '_ {
    cards
        .iter()
        .flat_map(|card| card.words.iter())
        .filter_map(|entry| format_note(entry))
}

/// Returns the header lines that tell Anki how to read the file.
pub fn format_header(deck_name: &str) -> String {
    format!(
        "#separator:tab\n#html:true\n#deck:{}\n#columns:{}\n",
        clean_field(deck_name),
        NOTE_COLUMNS.join("\t")
    )
}

/// Formats one note line, or `None` when the word has no translation.
pub fn format_note(entry: &WordEntry) -> Option<String> {
    if entry.translation.translations.is_empty() {
        info!(word = %entry.word, "No translation for word");
        return None;
    }

    let back = entry
        .translation
        .translations
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let examples = format_examples(&entry.dictionary);

    Some(
        [entry.word.as_str(), back.as_str(), examples.as_str()]
            .map(clean_field)
            .join("\t"),
    )
}

/// Formats the examples column from the first definition's first translation.
///
/// Returns `---` when the dictionary has nothing to show.
pub fn format_examples(dictionary: &DictionaryEntry) -> String {
    let mut column = String::new();

    let first = dictionary
        .def
        .first()
        .and_then(|def| def.tr.first().map(|tr| (def, tr)));

    if let Some((def, tr)) = first {
        column.push_str(&format!("</br>({}) {}<br/>{}<br/>", tr.pos, tr.text, def.ts));

        if !tr.ex.is_empty() {
            let examples = tr
                .ex
                .iter()
                .take(MAX_EXAMPLES)
                .map(|ex| format!("{} -> {}", ex.text, join_texts(&ex.tr)))
                .collect::<Vec<_>>()
                .join(",");
            column.push_str(&format!("<small>Пример: {examples}</small><br/>"));
        }

        if !tr.syn.is_empty() {
            let synonyms = tr
                .syn
                .iter()
                .take(MAX_SYNONYMS)
                .map(|syn| format!("({}) {}", syn.pos, syn.text))
                .collect::<Vec<_>>()
                .join(",");
            column.push_str(&format!("<small>{synonyms}</small>"));
        }
    }

    if column.is_empty() {
        EMPTY_EXAMPLES.to_string()
    } else {
        column
    }
}

fn join_texts(items: &[TextItem]) -> String {
    items
        .iter()
        .map(|item| item.text.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Tabs and line breaks would split the note.
fn clean_field(field: &str) -> String {
    field.replace(|c: char| matches!(c, '\t' | '\n' | '\r'), " ")
}
