//! Run/Cascade Context
//!
//!     Aggregates finished block records and decides when output is written.
//!
//!     A [`RunContext`] lives for the whole conversion. It owns the [`OutputWriter`] and at most
//!     one open [`CascadeContext`] at a time; the cascade is moved out and consumed when it is
//!     finalized, so nothing refers to it afterwards.
//!
//!     Output is triggered by block kinds:
//!         - leaving Run Control writes `initial.json`
//!         - leaving End of Cascade resolves cross-references and writes the cascade
//!         - leaving End of Run writes `summary.json`
//!     [`RunContext::finish`] closes whatever the input left open.

pub mod crossref;

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::marlowe::error::Result;
use crate::marlowe::kinds::{BlockKind, Scope};
use crate::marlowe::output::OutputWriter;
use crate::marlowe::record::{merge, Record};
use crate::marlowe::separator::Block;

/// Identifies one cascade within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct CascadeIndex {
    #[serde(rename = "Cascade")]
    pub cascade: u32,
    #[serde(rename = "Group")]
    pub group: u32,
    #[serde(rename = "Number")]
    pub number: u32,
}

impl CascadeIndex {
    pub fn new(cascade: u32, group: u32, number: u32) -> Self {
        CascadeIndex {
            cascade,
            group,
            number,
        }
    }
}

impl fmt::Display for CascadeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cascade {} (group {}, number {})",
            self.cascade, self.group, self.number
        )
    }
}

/// Records of the cascade being read.
#[derive(Debug, Clone)]
pub struct CascadeContext {
    index: CascadeIndex,
    record: Record,
    dumps: usize,
}

impl CascadeContext {
    pub fn new(index: CascadeIndex) -> Self {
        CascadeContext {
            index,
            record: Record::new(),
            dumps: 0,
        }
    }

    pub fn index(&self) -> CascadeIndex {
        self.index
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn insert(&mut self, kind: BlockKind, record: Record) {
        for key in merge(&mut self.record, record) {
            warn!(index = %self.index, %kind, key = %key, "cascade record field overwritten");
        }
    }

    fn next_dump(&mut self) -> usize {
        self.dumps += 1;
        self.dumps
    }

    /// Resolve cross-references and produce the cascade document.
    ///
    /// The three detail parts are replaced by one merged `Detail` sequence.
    pub fn finalize(self) -> Record {
        let CascadeContext {
            index, mut record, ..
        } = self;
        crossref::attach_interstitials(&mut record, index);
        let mut details = crossref::merge_details(&record);

        let mut document = Record::new();
        if !record.contains_key("Index") {
            if let Ok(value) = serde_json::to_value(index) {
                document.insert("Index".to_string(), value);
            }
        }
        for (key, value) in record {
            if crossref::DETAIL_PARTS.contains(&key.as_str()) {
                if let Some(rows) = details.take() {
                    document.insert("Detail".to_string(), rows.into());
                }
            } else {
                document.insert(key, value);
            }
        }
        document
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Preamble,
    Cascades,
    Statistics,
    Finished,
}

/// Totals reported when a run finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub cascades: usize,
}

/// Process-wide aggregation state.
pub struct RunContext {
    writer: OutputWriter,
    initial: Record,
    statistics: Record,
    phase: Phase,
    cascade: Option<CascadeContext>,
    dumps: usize,
    cascades: usize,
}

impl RunContext {
    pub fn new(writer: OutputWriter) -> Self {
        RunContext {
            writer,
            initial: Record::new(),
            statistics: Record::new(),
            phase: Phase::Preamble,
            cascade: None,
            dumps: 0,
            cascades: 0,
        }
    }

    /// Index of the open cascade, if any.
    pub fn current_index(&self) -> Option<CascadeIndex> {
        self.cascade.as_ref().map(CascadeContext::index)
    }

    pub fn cascades(&self) -> usize {
        self.cascades
    }

    /// Open a new cascade, closing one left open by truncated input.
    pub fn begin_cascade(&mut self, index: CascadeIndex) -> Result<()> {
        if self.phase == Phase::Preamble {
            warn!(%index, "cascade started before run control; writing initial record now");
            self.write_initial()?;
        }
        if let Some(open) = self.cascade.take() {
            warn!(index = %open.index(), "cascade has no end marker; finalizing");
            self.close(open)?;
        }
        info!(%index, "cascade started");
        self.cascade = Some(CascadeContext::new(index));
        Ok(())
    }

    /// Store the record of a block that has just been exited and run its output triggers.
    pub fn accept(&mut self, block: &Block, record: Record) -> Result<()> {
        let kind = block.kind;
        if kind == BlockKind::CascadeStart {
            self.begin_cascade(block.index.unwrap_or_default())?;
        }
        if self.writer.dumps_enabled() {
            self.dump(block)?;
        }
        match kind.scope() {
            Scope::Cascade => self.accept_cascade(kind, record)?,
            Scope::Run if is_statistics(kind) => self.accept_statistics(kind, record)?,
            Scope::Run => self.accept_preamble(kind, record)?,
        }
        debug!(%kind, line = block.start_line(), "block stored");
        Ok(())
    }

    fn accept_preamble(&mut self, kind: BlockKind, record: Record) -> Result<()> {
        if self.phase != Phase::Preamble {
            warn!(%kind, "preamble block after run control ignored");
            return Ok(());
        }
        merge(&mut self.initial, record);
        if kind == BlockKind::Control {
            self.write_initial()?;
        }
        Ok(())
    }

    fn accept_cascade(&mut self, kind: BlockKind, record: Record) -> Result<()> {
        let Some(cascade) = self.cascade.as_mut() else {
            warn!(%kind, "cascade block outside any cascade ignored");
            return Ok(());
        };
        cascade.insert(kind, record);
        if kind == BlockKind::CascadeEnd {
            if let Some(open) = self.cascade.take() {
                self.close(open)?;
            }
        }
        Ok(())
    }

    fn accept_statistics(&mut self, kind: BlockKind, record: Record) -> Result<()> {
        if self.phase == Phase::Preamble {
            warn!("run statistics before run control; writing initial record now");
            self.write_initial()?;
        }
        if let Some(open) = self.cascade.take() {
            warn!(index = %open.index(), "cascade has no end marker; finalizing");
            self.close(open)?;
        }
        if self.phase == Phase::Finished {
            warn!(%kind, "block after end of run ignored");
            return Ok(());
        }
        self.phase = Phase::Statistics;
        merge(&mut self.statistics, record);
        if kind == BlockKind::RunEnd {
            self.write_summary()?;
        }
        Ok(())
    }

    fn dump(&mut self, block: &Block) -> Result<()> {
        let (index, seq) = match (block.kind.scope(), self.cascade.as_mut()) {
            (Scope::Cascade, Some(cascade)) => (Some(cascade.index()), cascade.next_dump()),
            _ => {
                self.dumps += 1;
                (None, self.dumps)
            }
        };
        self.writer.dump_block(index, seq, block.kind, &block.text())
    }

    fn close(&mut self, cascade: CascadeContext) -> Result<()> {
        let index = cascade.index();
        let document = cascade.finalize();
        self.writer.write_cascade(index, &document)?;
        self.cascades += 1;
        info!(%index, "cascade written");
        Ok(())
    }

    fn write_initial(&mut self) -> Result<()> {
        self.writer.write_initial(&self.initial)?;
        self.phase = Phase::Cascades;
        Ok(())
    }

    fn write_summary(&mut self) -> Result<()> {
        let mut summary = self.initial.clone();
        merge(&mut summary, self.statistics.clone());
        self.writer.write_summary(&summary)?;
        self.phase = Phase::Finished;
        info!(cascades = self.cascades, "run summary written");
        Ok(())
    }

    /// Close anything still open and flush the bundled tables.
    pub fn finish(mut self) -> Result<RunTotals> {
        if let Some(open) = self.cascade.take() {
            warn!(index = %open.index(), "input ended inside a cascade; finalizing");
            self.close(open)?;
        }
        if self.phase == Phase::Preamble {
            warn!("input ended before run control; writing initial record");
            self.write_initial()?;
        }
        if self.phase != Phase::Finished {
            warn!("input ended before end of run; writing run summary");
            self.write_summary()?;
        }
        let totals = RunTotals {
            cascades: self.cascades,
        };
        self.writer.finish()?;
        Ok(totals)
    }
}

fn is_statistics(kind: BlockKind) -> bool {
    matches!(
        kind,
        BlockKind::FinalSummary
            | BlockKind::Moments
            | BlockKind::Histogram
            | BlockKind::ElementStats
            | BlockKind::RunEnd
    )
}
