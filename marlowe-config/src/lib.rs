//! Configuration loader for marlowe-log.
//!
//! `defaults/marlowe.default.toml` is embedded into every binary so the documented keys and the
//! runtime defaults cannot drift apart. Applications layer user files and command-line overrides
//! on top of it via [`Loader`] and deserialize into the core's [`RunOptions`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use std::path::Path;

pub use config::ConfigError;
pub use marlowe_log::marlowe::options::{
    OutputOptions, ParserMode, ParsingOptions, RunOptions, TableMode, TransitionPolicy,
};

const DEFAULT_TOML: &str = include_str!("../defaults/marlowe.default.toml");

/// Layers user settings over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file, ignored if absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `("output.tables", "bundled")`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the layers and deserialize the run options.
    pub fn build(self) -> Result<RunOptions, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<RunOptions, ConfigError> {
    Loader::new().build()
}
