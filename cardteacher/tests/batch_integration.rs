//! Integration tests for a full deck build.
//!
//! These tests drive the public API end to end:
//! - Card lookup, key derivation, dictionary and translation per word
//! - Lookup sharing between cards of one batch
//! - Anki file output
//! - Batch failure leaving no output behind
//! - Rate limiting across a batch

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use cardteacher::export::AnkiTextExporter;
use cardteacher::limiter::RateLimiter;
use cardteacher::orchestrator::{BatchError, BatchOrchestrator, GenerateError};
use cardteacher::pipeline::PipelineError;
use cardteacher::provider::{
    Card, CardPair, CardSource, Definition, DictionaryEntry, DictionarySource,
    DictionaryTranslation, Example, ProviderError, Synonym, TextItem, Translation,
    TranslationEntry, TranslationSource,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn card(name: &str, oracle_text: &str, type_line: &str, lang: &str) -> Card {
    Card {
        name: name.to_string(),
        lang: lang.to_string(),
        set: "m21".to_string(),
        collector_number: "1".to_string(),
        type_line: type_line.to_string(),
        oracle_text: oracle_text.to_string(),
        ..Default::default()
    }
}

/// Card database with a fixed set of instants.
struct FixtureCards {
    cards: HashMap<String, CardPair>,
    calls: AtomicUsize,
}

impl FixtureCards {
    fn burn() -> Self {
        let mut cards = HashMap::new();
        for (name, oracle) in [
            ("Shock", "Shock deals 2 damage to any target."),
            ("Lightning Bolt", "Lightning Bolt deals 3 damage to any target."),
        ] {
            let mut localized = card(name, oracle, "Instant", "ru");
            localized.printed_name = Some(format!("{} (ru)", name));
            cards.insert(
                name.to_lowercase(),
                CardPair {
                    card: card(name, oracle, "Instant", "en"),
                    localized,
                },
            );
        }
        Self {
            cards,
            calls: AtomicUsize::new(0),
        }
    }
}

impl CardSource for FixtureCards {
    async fn lookup_card(&self, name: &str) -> Result<CardPair, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cards
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }
}

/// Dictionary returning one definition per word; some words can carry an
/// embedded error code.
#[derive(Default)]
struct FixtureDictionary {
    calls: Mutex<Vec<String>>,
    errors: HashMap<String, (u32, String)>,
}

impl FixtureDictionary {
    fn with_embedded_error(mut self, word: &str, code: u32, message: &str) -> Self {
        self.errors
            .insert(word.to_string(), (code, message.to_string()));
        self
    }

    fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl DictionarySource for FixtureDictionary {
    async fn lookup(&self, word: &str) -> Result<DictionaryEntry, ProviderError> {
        self.calls.lock().push(word.to_string());

        if let Some((code, message)) = self.errors.get(word) {
            return Ok(DictionaryEntry {
                code: Some(*code),
                message: Some(message.clone()),
                ..Default::default()
            });
        }

        Ok(DictionaryEntry {
            def: vec![Definition {
                text: word.to_string(),
                pos: "noun".to_string(),
                ts: "ts".to_string(),
                tr: vec![DictionaryTranslation {
                    text: format!("{}-ru", word),
                    pos: "noun".to_string(),
                    syn: vec![Synonym {
                        text: format!("{}-syn", word),
                        pos: "noun".to_string(),
                        ..Default::default()
                    }],
                    ex: vec![Example {
                        text: format!("a {}", word),
                        tr: vec![TextItem {
                            text: format!("{}-ex", word),
                        }],
                    }],
                    ..Default::default()
                }],
            }],
            ..Default::default()
        })
    }
}

/// Translator with no output for "to".
#[derive(Default)]
struct FixtureTranslator {
    calls: AtomicUsize,
}

impl TranslationSource for FixtureTranslator {
    async fn translate(&self, text: &str) -> Result<TranslationEntry, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let translations = if text == "to" {
            Vec::new()
        } else {
            vec![Translation {
                text: format!("{} (ru)", text),
                detected_language_code: "en".to_string(),
            }]
        };
        Ok(TranslationEntry {
            translations,
            ..Default::default()
        })
    }
}

struct Fixture {
    cards: Arc<FixtureCards>,
    dictionary: Arc<FixtureDictionary>,
    translator: Arc<FixtureTranslator>,
    orchestrator: BatchOrchestrator<FixtureCards, FixtureDictionary, FixtureTranslator>,
}

fn fixture(dictionary: FixtureDictionary, limiter: RateLimiter) -> Fixture {
    let cards = Arc::new(FixtureCards::burn());
    let dictionary = Arc::new(dictionary);
    let translator = Arc::new(FixtureTranslator::default());
    let orchestrator = BatchOrchestrator::new(
        Arc::clone(&cards),
        Arc::clone(&dictionary),
        Arc::clone(&translator),
        Arc::new(limiter),
    );
    Fixture {
        cards,
        dictionary,
        translator,
        orchestrator,
    }
}

fn generous_limiter() -> RateLimiter {
    RateLimiter::new(1000, Duration::from_secs(1))
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_deck_written_in_card_order() {
    let temp_dir = TempDir::new().unwrap();
    let writer = AnkiTextExporter::in_directory(&temp_dir.path().join("decks"), "Burn");
    let fixture = fixture(FixtureDictionary::default(), generous_limiter());

    let result = fixture
        .orchestrator
        .run_and_export(
            &names(&["Shock", "Lightning Bolt"]),
            &writer,
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.cards.len(), 2);
    assert_eq!(result.cards[0].name, "Shock");
    assert_eq!(result.cards[1].localized.printed_name.as_deref(), Some("Lightning Bolt (ru)"));

    let content = std::fs::read_to_string(temp_dir.path().join("decks").join("Burn.txt")).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(
        &lines[..4],
        &[
            "#separator:tab",
            "#html:true",
            "#deck:Burn",
            "#columns:English\tRussian\tExamples",
        ]
    );
    assert_eq!(
        lines[4],
        "shock\tshock (ru)\t</br>(noun) shock-ru<br/>ts<br/>\
         <small>Пример: a shock -> shock-ex</small><br/><small>(noun) shock-syn</small>"
    );
    assert!(lines.last().unwrap().starts_with("Lightning Bolt\tLightning Bolt (ru)\t"));

    // 8 + 9 word entries, "to" has no translation in either card
    assert_eq!(lines.len() - 4, 15);
    assert!(!lines.iter().any(|line| line.starts_with("to\t")));
}

#[tokio::test]
async fn test_words_shared_between_cards_looked_up_once() {
    let fixture = fixture(FixtureDictionary::default(), generous_limiter());

    let result = fixture
        .orchestrator
        .run_batch(&names(&["Shock", "Lightning Bolt"]))
        .await
        .unwrap();

    // shock, deals, damage, to, any, target, instant, lightning, bolt, lightning bolt
    assert_eq!(fixture.dictionary.call_count(), 10);
    assert_eq!(fixture.translator.calls.load(Ordering::SeqCst), 10);
    assert_eq!(fixture.cards.calls.load(Ordering::SeqCst), 2);

    assert_eq!(result.stats.cache.computations, 12);
    assert_eq!(result.stats.permits_acquired, 20);
    assert_eq!(result.stats.completed, 2);

    // Both cards hold the same entry for a shared word
    let damage = |index: usize| {
        result.cards[index]
            .words
            .iter()
            .find(|entry| entry.word == "damage")
            .cloned()
            .unwrap()
    };
    assert!(Arc::ptr_eq(&damage(0), &damage(1)));
}

#[tokio::test]
async fn test_unknown_card_fails_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let writer = AnkiTextExporter::new(temp_dir.path().join("deck.txt"), "Burn");
    let fixture = fixture(FixtureDictionary::default(), generous_limiter());

    let err = fixture
        .orchestrator
        .run_and_export(
            &names(&["Shock", "Black Lotus"]),
            &writer,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        GenerateError::Batch(BatchError::ItemFailed { item, source }) => {
            assert_eq!(item, "Black Lotus");
            assert!(matches!(
                source,
                PipelineError::Provider {
                    source: ProviderError::NotFound(_),
                    ..
                }
            ));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!writer.path().exists());
}

#[tokio::test]
async fn test_embedded_dictionary_error_fails_batch() {
    let dictionary =
        FixtureDictionary::default().with_embedded_error("target", 401, "API key is invalid");
    let fixture = fixture(dictionary, generous_limiter());

    let err = fixture
        .orchestrator
        .run_batch(&names(&["Shock"]))
        .await
        .unwrap_err();

    match err {
        BatchError::ItemFailed {
            source:
                PipelineError::Provider {
                    source: ProviderError::Upstream { code, message, .. },
                    ..
                },
            ..
        } => {
            assert_eq!(code, 401);
            assert_eq!(message, "API key is invalid");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_spreads_calls_over_windows() {
    // 20 calls at 4 per 50ms need five windows
    let fixture = fixture(
        FixtureDictionary::default(),
        RateLimiter::new(4, Duration::from_millis(50)),
    );

    let result = fixture
        .orchestrator
        .run_batch(&names(&["Shock", "Lightning Bolt"]))
        .await
        .unwrap();

    assert_eq!(result.stats.permits_acquired, 20);
    assert!(result.stats.elapsed >= Duration::from_millis(200));
    assert!(fixture.orchestrator.limiter().delayed_total() > 0);
}

#[tokio::test]
async fn test_cancelled_batch_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let writer = AnkiTextExporter::new(temp_dir.path().join("deck.txt"), "Burn");
    let fixture = fixture(FixtureDictionary::default(), generous_limiter());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = fixture
        .orchestrator
        .run_and_export(&names(&["Shock", "Lightning Bolt"]), &writer, cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::Batch(BatchError::Cancelled)));
    assert!(!writer.path().exists());
}
