//! User configuration.
//!
//! Settings are read from `~/.cardteacher/config.ini`. A missing file means
//! defaults; every key is optional and overlays its default.
//!
//! # Example
//!
//! ```no_run
//! use cardteacher::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! println!("{} calls per {:?}", config.rate_limit.capacity, config.rate_limit.window());
//! # Ok::<(), cardteacher::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::*;
