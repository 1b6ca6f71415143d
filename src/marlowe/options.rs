//! Run options
//!
//! Everything a conversion can be told: where output goes and how it is laid out, and how the
//! parser reacts to text it does not understand. `marlowe-config` deserializes these from TOML;
//! library callers can build them directly, starting from [`RunOptions::default`].

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_CASCADE_DIR: &str = "casc{cascade:04}-{group:03}-{number:03}";
pub const DEFAULT_BLOCK_DUMP: &str = "{seq:02}.{block}.txt";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct RunOptions {
    #[serde(default)]
    pub output: OutputOptions,
    #[serde(default)]
    pub parsing: ParsingOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Directory receiving `initial.json`, `summary.json`, bundled tables and cascade folders.
    pub root: PathBuf,
    /// Template naming each cascade's folder.
    pub cascade_dir: String,
    /// Template naming raw block dumps.
    pub block_dump: String,
    pub dump_raw_blocks: bool,
    pub tables: TableMode,
}

impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions {
            root: PathBuf::from("marlowe-out"),
            cascade_dir: DEFAULT_CASCADE_DIR.to_string(),
            block_dump: DEFAULT_BLOCK_DUMP.to_string(),
            dump_raw_blocks: false,
            tables: TableMode::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct ParsingOptions {
    /// Replace a block that fails its grammar with an empty record instead of aborting.
    #[serde(default)]
    pub ignore_block_parse_error: bool,
    #[serde(default)]
    pub parser: ParserMode,
    #[serde(default)]
    pub transitions: TransitionPolicy,
}

/// Which table layouts are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TableMode {
    /// One set of tables inside each cascade folder.
    Cascade,
    /// One `*_all.csv` set at the output root.
    Bundled,
    #[default]
    Both,
    None,
}

impl TableMode {
    pub fn per_cascade(self) -> bool {
        matches!(self, TableMode::Cascade | TableMode::Both)
    }

    pub fn bundled(self) -> bool {
        matches!(self, TableMode::Bundled | TableMode::Both)
    }
}

/// Lifecycle of block grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ParserMode {
    /// Build each grammar once and reuse it.
    #[default]
    Pooled,
    /// Build a grammar for every block.
    Fresh,
}

/// What the separator does with a line that opens a block kind not allowed in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionPolicy {
    /// Accumulate it into the current block.
    #[default]
    Lenient,
    /// Fail with [`ConvertError::UnexpectedBlock`](crate::marlowe::error::ConvertError::UnexpectedBlock).
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_modes() {
        assert!(TableMode::Both.per_cascade() && TableMode::Both.bundled());
        assert!(TableMode::Cascade.per_cascade() && !TableMode::Cascade.bundled());
        assert!(!TableMode::Bundled.per_cascade() && TableMode::Bundled.bundled());
        assert!(!TableMode::None.per_cascade() && !TableMode::None.bundled());
    }

    #[test]
    fn defaults_are_lenient_and_pooled() {
        let options = RunOptions::default();
        assert_eq!(options.parsing.parser, ParserMode::Pooled);
        assert_eq!(options.parsing.transitions, TransitionPolicy::Lenient);
        assert!(!options.parsing.ignore_block_parse_error);
        assert_eq!(options.output.cascade_dir, DEFAULT_CASCADE_DIR);
    }
}
