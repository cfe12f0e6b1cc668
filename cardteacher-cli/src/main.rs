//! cardteacher CLI - Command-line interface
//!
//! Builds Anki vocabulary decks from trading card deck lists.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::config::ConfigCommands;
use commands::generate::GenerateArgs;

#[derive(Parser)]
#[command(name = "cardteacher")]
#[command(version = cardteacher::VERSION)]
#[command(about = "Build Anki vocabulary decks from trading card lists", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.cardteacher/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up every card in a deck list and write an Anki import file
    Generate {
        /// Deck list file (lines like "4 Lightning Bolt")
        list_file: PathBuf,

        /// Output file (default: <export.output_dir>/<deck name>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Deck name written to the file header
        #[arg(short, long)]
        deck_name: Option<String>,

        /// Debug-level logging (RUST_LOG takes precedence)
        #[arg(short, long)]
        verbose: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            list_file,
            output,
            deck_name,
            verbose,
        } => commands::generate::run(GenerateArgs {
            list_file,
            output,
            deck_name,
            config: cli.config,
            verbose,
        }),
        Commands::Config { command } => commands::config::run(command, cli.config),
    };

    if let Err(e) = result {
        e.exit();
    }
}
