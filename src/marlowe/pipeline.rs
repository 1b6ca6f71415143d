//! Conversion pipeline
//!
//! Drives one report through every stage:
//!
//!     separator -> grammar -> transform -> context -> output
//!
//! Each block is fully parsed, transformed and stored before the separator reads past the line
//! that closed it. Output for earlier cascades is already on disk when a later block aborts the
//! run, and it is left there.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::marlowe::context::RunContext;
use crate::marlowe::error::{ConvertError, Result};
use crate::marlowe::grammar::BlockParser;
use crate::marlowe::options::RunOptions;
use crate::marlowe::output::OutputWriter;
use crate::marlowe::record::Record;
use crate::marlowe::separator::{suspicious_lines, Block, BlockSeparator};
use crate::marlowe::transform::{transform, TransformContext};

/// What a finished run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub blocks: usize,
    pub cascades: usize,
    /// Blocks that failed their grammar and were replaced by empty records.
    pub skipped: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} blocks, {} cascades, {} skipped",
            self.blocks, self.cascades, self.skipped
        )
    }
}

/// Converts reports according to one set of options.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: RunOptions,
}

impl Converter {
    pub fn new(options: RunOptions) -> Self {
        Converter { options }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Convert the report at `path`.
    pub fn convert_path(&self, path: impl AsRef<Path>) -> Result<RunReport> {
        let file = File::open(path.as_ref()).map_err(ConvertError::Read)?;
        self.convert(BufReader::new(file))
    }

    /// Convert a report read from `reader`.
    pub fn convert<R: BufRead>(&self, reader: R) -> Result<RunReport> {
        let writer = OutputWriter::create(&self.options.output)?;
        info!(root = %writer.root().display(), "conversion started");
        let mut run = RunContext::new(writer);
        let mut parser = BlockParser::new(self.options.parsing.parser);
        let mut report = RunReport::default();

        for block in BlockSeparator::new(reader, self.options.parsing.transitions) {
            let block = block?;
            report.blocks += 1;
            if !self.exit(&block, &mut parser, &mut run)? {
                report.skipped += 1;
            }
        }

        report.cascades = run.finish()?.cascades;
        info!(%report, "conversion finished");
        Ok(report)
    }

    /// Parse, transform and store one exited block. Returns false when the block was skipped.
    fn exit(&self, block: &Block, parser: &mut BlockParser, run: &mut RunContext) -> Result<bool> {
        let (record, parsed) = match parser.parse(block) {
            Ok(tree) => {
                let ctx = TransformContext::new(block.index, block.start_line());
                (transform(tree, &ctx), true)
            }
            Err(err) if self.options.parsing.ignore_block_parse_error => {
                warn!(%err, "block skipped");
                for line in suspicious_lines(block) {
                    debug!(line = line.number, text = %line.text, "line looks like another block's start");
                }
                (Record::new(), false)
            }
            Err(err) => return Err(err.into()),
        };
        run.accept(block, record)?;
        Ok(parsed)
    }
}
