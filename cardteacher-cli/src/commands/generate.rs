//! Generate command - build an Anki import file from a deck list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use cardteacher::config::ConfigFile;
use cardteacher::decklist::parse_deck_file;
use cardteacher::export::AnkiTextExporter;
use cardteacher::limiter::RateLimiter;
use cardteacher::orchestrator::{BatchOrchestrator, BatchResult};
use cardteacher::provider::{
    AsyncReqwestClient, ScryfallSource, YandexDictionary, YandexTranslator,
};

use crate::error::CliError;
use crate::runner::CliRunner;

type LiveOrchestrator = BatchOrchestrator<
    ScryfallSource<AsyncReqwestClient>,
    YandexDictionary<AsyncReqwestClient>,
    YandexTranslator<AsyncReqwestClient>,
>;

/// Arguments for the generate command.
#[derive(Debug, Default)]
pub struct GenerateArgs {
    pub list_file: PathBuf,
    pub output: Option<PathBuf>,
    pub deck_name: Option<String>,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.verbose)?;
    runner.log_startup("generate");
    let config = runner.config();

    let missing = config.yandex.missing_credentials();
    if !missing.is_empty() {
        return Err(CliError::MissingCredentials(missing));
    }

    let names = parse_deck_file(&args.list_file)?;
    if names.is_empty() {
        return Err(CliError::EmptyDeckList(args.list_file.display().to_string()));
    }
    info!(cards = names.len(), list = %args.list_file.display(), "Loaded deck list");

    let writer = resolve_writer(config, args.output.as_deref(), args.deck_name.as_deref());
    let orchestrator = build_orchestrator(config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    println!("Building '{}' from {} cards...", writer.deck_name(), names.len());
    let result = runtime.block_on(generate(&orchestrator, &names, &writer))?;

    print_summary(&result, writer.path());
    Ok(())
}

/// Picks the output path: an explicit `--output`, otherwise
/// `<output_dir>/<deck name>.txt` from the config.
fn resolve_writer(
    config: &ConfigFile,
    output: Option<&Path>,
    deck_name: Option<&str>,
) -> AnkiTextExporter {
    let deck_name = deck_name.unwrap_or(config.export.deck_name.as_str());
    match output {
        Some(path) => AnkiTextExporter::new(path, deck_name),
        None => AnkiTextExporter::in_directory(&config.export.output_dir, deck_name),
    }
}

fn build_orchestrator(config: &ConfigFile) -> Result<LiveOrchestrator, CliError> {
    let http_client =
        AsyncReqwestClient::with_timeout(config.http.timeout).map_err(CliError::ProviderSetup)?;

    let cards = ScryfallSource::new(
        http_client.clone(),
        &config.scryfall.base_url,
        &config.scryfall.default_lang,
        &config.scryfall.alternate_lang,
    )
    .map_err(CliError::ProviderSetup)?;

    let yandex = &config.yandex;
    let dictionary = YandexDictionary::new(
        http_client.clone(),
        &yandex.dictionary_url,
        yandex.dictionary_key.as_deref().unwrap_or_default(),
        &yandex.source_lang,
        &yandex.target_lang,
    )
    .map_err(CliError::ProviderSetup)?;

    let translator = YandexTranslator::new(
        http_client,
        &yandex.translate_url,
        yandex.iam_token.as_deref().unwrap_or_default(),
        yandex.folder_id.as_deref().unwrap_or_default(),
        &yandex.source_lang,
        &yandex.target_lang,
    )
    .map_err(CliError::ProviderSetup)?;

    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit.capacity,
        config.rate_limit.window(),
    ));

    Ok(BatchOrchestrator::new(
        Arc::new(cards),
        Arc::new(dictionary),
        Arc::new(translator),
        limiter,
    ))
}

/// Runs the batch, cancelling it on Ctrl-C.
async fn generate(
    orchestrator: &LiveOrchestrator,
    names: &[String],
    writer: &AnkiTextExporter,
) -> Result<BatchResult, CliError> {
    let cancel = CancellationToken::new();

    let interrupt = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling remaining cards");
            interrupt.cancel();
        }
    });

    let result = orchestrator.run_and_export(names, writer, cancel).await;
    signal_task.abort();

    Ok(result?)
}

fn print_summary(result: &BatchResult, path: &Path) {
    println!();
    for line in summary_lines(result, path) {
        println!("{}", line);
    }
}

fn summary_lines(result: &BatchResult, path: &Path) -> Vec<String> {
    let words: usize = result.cards.iter().map(|card| card.words.len()).sum();
    let stats = &result.stats;

    vec![
        format!("Deck written to {}", path.display()),
        format!("  Cards:       {}", result.cards.len()),
        format!("  Words:       {}", words),
        format!("  Lookups:     {}", stats.cache.computations),
        format!("  Reused:      {:.1}%", stats.cache.dedup_ratio() * 100.0),
        format!(
            "  Time:        {:.1}s ({:.2} cards/s)",
            stats.elapsed.as_secs_f64(),
            stats.items_per_sec()
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardteacher::orchestrator::BatchStats;

    #[test]
    fn test_writer_defaults_to_config_directory() {
        let mut config = ConfigFile::default();
        config.export.output_dir = PathBuf::from("/tmp/decks");

        let writer = resolve_writer(&config, None, None);

        assert_eq!(writer.path(), Path::new("/tmp/decks/MTG Cards.txt"));
        assert_eq!(writer.deck_name(), "MTG Cards");
    }

    #[test]
    fn test_flags_override_config() {
        let config = ConfigFile::default();

        let writer = resolve_writer(&config, Some(Path::new("out/burn.txt")), Some("Burn"));

        assert_eq!(writer.path(), Path::new("out/burn.txt"));
        assert_eq!(writer.deck_name(), "Burn");
    }

    #[test]
    fn test_summary_reports_throughput() {
        let result = BatchResult {
            cards: Vec::new(),
            stats: BatchStats {
                items: 8,
                completed: 8,
                elapsed: std::time::Duration::from_secs(4),
                ..Default::default()
            },
        };

        let lines = summary_lines(&result, Path::new("deck.txt"));

        assert_eq!(lines[0], "Deck written to deck.txt");
        assert_eq!(lines[5], "  Time:        4.0s (2.00 cards/s)");
    }

    #[test]
    fn test_build_orchestrator_uses_rate_limit() {
        let mut config = ConfigFile::default();
        config.rate_limit.capacity = 7;

        let orchestrator = build_orchestrator(&config).unwrap();

        assert_eq!(orchestrator.limiter().capacity(), 7);
    }

    #[test]
    fn test_build_orchestrator_rejects_bad_url() {
        let mut config = ConfigFile::default();
        config.scryfall.base_url = "not a url".to_string();

        assert!(matches!(
            build_orchestrator(&config),
            Err(CliError::ProviderSetup(_))
        ));
    }
}
