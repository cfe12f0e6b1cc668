//! Configuration management CLI commands.
//!
//! Provides `config init`, `config path` and `config show`.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use cardteacher::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::load_config;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Create a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration file path
    Path,

    /// Show the effective settings (credentials masked)
    Show,
}

/// Run a config subcommand.
///
/// `config_path` overrides the default ~/.cardteacher/config.ini.
pub fn run(command: ConfigCommands, config_path: Option<PathBuf>) -> Result<(), CliError> {
    let path = config_path.unwrap_or_else(config_file_path);
    match command {
        ConfigCommands::Init { force } => run_init(&path, force),
        ConfigCommands::Path => run_path(&path),
        ConfigCommands::Show => run_show(&path),
    }
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    let created = if force {
        ConfigFile::default().save_to(path)?;
        true
    } else {
        ConfigFile::ensure_exists_at(path)?
    };

    if created {
        println!("Created {}", path.display());
        println!();
        println!("Fill in dictionary_key, iam_token and folder_id in the [yandex]");
        println!("section before running 'cardteacher generate'.");
    } else {
        println!("Config file already exists: {}", path.display());
        println!("Use --force to replace it with defaults.");
    }
    Ok(())
}

fn run_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    Ok(())
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let config = load_config(Some(path))?;
    for line in describe(&config) {
        println!("{}", line);
    }
    Ok(())
}

/// Renders the settings as `section.key = value` lines.
fn describe(config: &ConfigFile) -> Vec<String> {
    let yandex = &config.yandex;
    vec![
        format!("scryfall.base_url = {}", config.scryfall.base_url),
        format!("scryfall.default_lang = {}", config.scryfall.default_lang),
        format!("scryfall.alternate_lang = {}", config.scryfall.alternate_lang),
        format!("yandex.dictionary_key = {}", mask(yandex.dictionary_key.as_deref())),
        format!("yandex.iam_token = {}", mask(yandex.iam_token.as_deref())),
        format!("yandex.folder_id = {}", yandex.folder_id.as_deref().unwrap_or("(not set)")),
        format!("yandex.dictionary_url = {}", yandex.dictionary_url),
        format!("yandex.translate_url = {}", yandex.translate_url),
        format!("yandex.source_lang = {}", yandex.source_lang),
        format!("yandex.target_lang = {}", yandex.target_lang),
        format!("rate_limit.capacity = {}", config.rate_limit.capacity),
        format!("rate_limit.window_ms = {}", config.rate_limit.window_ms),
        format!("http.timeout = {}", config.http.timeout),
        format!("export.deck_name = {}", config.export.deck_name),
        format!("export.output_dir = {}", config.export.output_dir.display()),
        format!("logging.file = {}", config.logging.file.display()),
    ]
}

fn mask(secret: Option<&str>) -> String {
    match secret {
        None => "(not set)".to_string(),
        Some(value) => {
            let visible: String = value.chars().take(4).collect();
            format!("{}****", visible)
        }
    }
}
