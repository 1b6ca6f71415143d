//! Error types for conversion runs
//!
//! Only two kinds of failure ever reach the caller: I/O (reading the log, writing the output
//! tree) and block grammar mismatches that the run was configured not to skip. Everything else
//! (cross-reference gaps, unclassified trailing text) is handled where it happens.

use crate::marlowe::context::CascadeIndex;
use crate::marlowe::kinds::BlockKind;
use crate::marlowe::output::template::TemplateError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

/// A completed block whose text does not conform to its grammar.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} block{} does not match its grammar at line {line}: {message}", describe_index(.index))]
pub struct BlockError {
    pub kind: BlockKind,
    pub index: Option<CascadeIndex>,
    /// Absolute input line of the first failure.
    pub line: usize,
    pub message: String,
}

fn describe_index(index: &Option<CascadeIndex>) -> String {
    match index {
        Some(index) => format!(" in {}", index),
        None => String::new(),
    }
}

fn describe_state(state: &Option<BlockKind>) -> String {
    match state {
        Some(kind) => kind.to_string(),
        None => "start of input".to_string(),
    }
}

/// Errors that abort a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read input: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write table {}: {source}", .path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to serialize {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Grammar(#[from] BlockError),

    #[error("line {line}: {found} block is not allowed after {}", describe_state(.state))]
    UnexpectedBlock {
        line: usize,
        found: BlockKind,
        state: Option<BlockKind>,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl ConvertError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::Write {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_error_names_kind_and_cascade() {
        let err = BlockError {
            kind: BlockKind::LatticeSites,
            index: Some(CascadeIndex::new(3, 1, 2)),
            line: 42,
            message: "unexpected 'x'".into(),
        };
        assert_eq!(
            err.to_string(),
            "lattice_sites block in cascade 3 (group 1, number 2) does not match its grammar at line 42: unexpected 'x'"
        );
    }

    #[test]
    fn block_error_without_cascade() {
        let err = BlockError {
            kind: BlockKind::Control,
            index: None,
            line: 7,
            message: "unknown label".into(),
        };
        assert_eq!(
            err.to_string(),
            "control block does not match its grammar at line 7: unknown label"
        );
    }

    #[test]
    fn unexpected_block_at_start() {
        let err = ConvertError::UnexpectedBlock {
            line: 1,
            found: BlockKind::Title,
            state: None,
        };
        assert_eq!(
            err.to_string(),
            "line 1: title block is not allowed after start of input"
        );
    }
}
