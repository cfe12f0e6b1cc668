//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use cardteacher::config::ConfigFileError;
use cardteacher::decklist::DeckListError;
use cardteacher::orchestrator::{BatchError, GenerateError};
use cardteacher::pipeline::PipelineError;
use cardteacher::provider::ProviderError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Config file could not be read or written
    ConfigFile(ConfigFileError),
    /// Required credentials are missing from the config
    MissingCredentials(Vec<&'static str>),
    /// Deck list could not be read
    DeckList(DeckListError),
    /// Deck list contained no cards
    EmptyDeckList(String),
    /// Failed to create an HTTP client or data source
    ProviderSetup(ProviderError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Batch or export failed
    Generate(GenerateError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::MissingCredentials(_) => {
                eprintln!();
                eprintln!("Set the missing keys in the [yandex] section of the config file.");
                eprintln!("Run 'cardteacher config init' to create one, and");
                eprintln!("'cardteacher config path' to find it.");
            }
            CliError::Generate(GenerateError::Batch(BatchError::ItemFailed {
                source:
                    PipelineError::Provider {
                        source: ProviderError::Upstream { code, .. },
                        ..
                    },
                ..
            })) if matches!(*code, 401 | 403) => {
                eprintln!();
                eprintln!("The service rejected the credentials. Check that:");
                eprintln!("  1. dictionary_key is a valid dictionary API key");
                eprintln!("  2. iam_token has not expired (IAM tokens last 12 hours)");
                eprintln!("  3. folder_id matches the cloud the token belongs to");
            }
            CliError::Generate(GenerateError::Batch(BatchError::ItemFailed {
                source:
                    PipelineError::Provider {
                        source: ProviderError::NotFound(_),
                        ..
                    },
                ..
            })) => {
                eprintln!();
                eprintln!("Check the spelling of the card name in the deck list.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::MissingCredentials(keys) => {
                write!(f, "Missing credentials: {}", keys.join(", "))
            }
            CliError::DeckList(e) => write!(f, "{}", e),
            CliError::EmptyDeckList(path) => write!(f, "No cards found in '{}'", path),
            CliError::ProviderSetup(e) => write!(f, "Failed to set up data sources: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Generate(e) => write!(f, "Deck generation failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::DeckList(e) => Some(e),
            CliError::ProviderSetup(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Generate(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<DeckListError> for CliError {
    fn from(e: DeckListError) -> Self {
        CliError::DeckList(e)
    }
}

impl From<GenerateError> for CliError {
    fn from(e: GenerateError) -> Self {
        CliError::Generate(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_message() {
        let err = CliError::MissingCredentials(vec!["iam_token", "folder_id"]);
        assert_eq!(err.to_string(), "Missing credentials: iam_token, folder_id");
    }

    #[test]
    fn test_generate_error_message_includes_card() {
        let err = CliError::from(GenerateError::Batch(BatchError::ItemFailed {
            item: "lightning bolt".to_string(),
            source: PipelineError::Cancelled,
        }));

        assert_eq!(
            err.to_string(),
            "Deck generation failed: card 'lightning bolt' failed: pipeline cancelled"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
