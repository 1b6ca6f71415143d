//! Block Grammars
//!
//!     One small grammar per block kind, composed from the terminal vocabulary. A grammar consumes
//!     the whole text of one block (boundary line included, every line ending in `\n`) and yields
//!     a typed tree; the transformers turn trees into records.
//!
//!     Grammars live in submodules grouped by report section:
//!         - preamble: banner through run control
//!         - cascade: boundary, primary recoil, summary, report atoms, cascade end
//!         - defects: lattice sites, ranges, replacement sequences, distant pairs
//!         - detail: the three detailed-description parts
//!         - statistics: final summary, moments, histograms, element statistics, run end
//!
//!     Two entry points. [`parse_block`] builds the grammar on every call and shares nothing.
//!     [`BlockParser`] keeps one built grammar per kind when created in
//!     [`ParserMode::Pooled`]; in [`ParserMode::Fresh`] it behaves like `parse_block`. Both produce
//!     identical trees. Built grammars are reference counted internally and so are not `Send`;
//!     a parser belongs to the thread that created it.

pub mod cascade;
pub mod defects;
pub mod detail;
pub mod preamble;
pub mod statistics;

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use std::collections::HashMap;

use crate::marlowe::error::BlockError;
use crate::marlowe::kinds::BlockKind;
use crate::marlowe::options::ParserMode;
use crate::marlowe::separator::Block;
use crate::marlowe::terms::{eol, line, ParseError, Terminal};

/// A parsed block, one variant per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockTree {
    Banner(preamble::Banner),
    Title(preamble::Title),
    Crystal(preamble::Crystal),
    Components(Vec<preamble::Component>),
    Potentials(Vec<preamble::Potential>),
    Inelastic(preamble::Inelastic),
    Surface(preamble::Surface),
    Beam(preamble::Beam),
    Control(Vec<preamble::ControlEntry>),
    CascadeStart(cascade::CascadeStart),
    Primary(cascade::Primary),
    Summary(Vec<cascade::Tally>),
    LatticeSites(Vec<defects::LatticeSite>),
    Ranges(Vec<defects::RecoilRange>),
    Sequences(Vec<defects::Sequence>),
    DistantPairs(Vec<defects::DistantPair>),
    ReportAtoms(cascade::ReportAtoms),
    DetailPart1(Vec<detail::Origin>),
    DetailPart2(Vec<detail::Launch>),
    DetailPart3(Vec<detail::Fate>),
    CascadeEnd(i64),
    FinalSummary(Vec<cascade::Tally>),
    Moments(statistics::Moments),
    Histogram(statistics::Histogram),
    ElementStats(statistics::ElementStats),
    RunEnd(statistics::RunEnd),
}

impl BlockTree {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockTree::Banner(_) => BlockKind::Banner,
            BlockTree::Title(_) => BlockKind::Title,
            BlockTree::Crystal(_) => BlockKind::Crystal,
            BlockTree::Components(_) => BlockKind::Components,
            BlockTree::Potentials(_) => BlockKind::Potentials,
            BlockTree::Inelastic(_) => BlockKind::Inelastic,
            BlockTree::Surface(_) => BlockKind::Surface,
            BlockTree::Beam(_) => BlockKind::Beam,
            BlockTree::Control(_) => BlockKind::Control,
            BlockTree::CascadeStart(_) => BlockKind::CascadeStart,
            BlockTree::Primary(_) => BlockKind::Primary,
            BlockTree::Summary(_) => BlockKind::Summary,
            BlockTree::LatticeSites(_) => BlockKind::LatticeSites,
            BlockTree::Ranges(_) => BlockKind::Ranges,
            BlockTree::Sequences(_) => BlockKind::Sequences,
            BlockTree::DistantPairs(_) => BlockKind::DistantPairs,
            BlockTree::ReportAtoms(_) => BlockKind::ReportAtoms,
            BlockTree::DetailPart1(_) => BlockKind::DetailPart1,
            BlockTree::DetailPart2(_) => BlockKind::DetailPart2,
            BlockTree::DetailPart3(_) => BlockKind::DetailPart3,
            BlockTree::CascadeEnd(_) => BlockKind::CascadeEnd,
            BlockTree::FinalSummary(_) => BlockKind::FinalSummary,
            BlockTree::Moments(_) => BlockKind::Moments,
            BlockTree::Histogram(_) => BlockKind::Histogram,
            BlockTree::ElementStats(_) => BlockKind::ElementStats,
            BlockTree::RunEnd(_) => BlockKind::RunEnd,
        }
    }
}

/// Build the whole-block grammar for `kind`.
pub fn grammar_for(kind: BlockKind) -> Terminal<BlockTree> {
    let grammar: Terminal<BlockTree> = match kind {
        BlockKind::Banner => preamble::banner().map(BlockTree::Banner).boxed(),
        BlockKind::Title => preamble::title().map(BlockTree::Title).boxed(),
        BlockKind::Crystal => preamble::crystal().map(BlockTree::Crystal).boxed(),
        BlockKind::Components => preamble::components().map(BlockTree::Components).boxed(),
        BlockKind::Potentials => preamble::potentials().map(BlockTree::Potentials).boxed(),
        BlockKind::Inelastic => preamble::inelastic().map(BlockTree::Inelastic).boxed(),
        BlockKind::Surface => preamble::surface().map(BlockTree::Surface).boxed(),
        BlockKind::Beam => preamble::beam().map(BlockTree::Beam).boxed(),
        BlockKind::Control => preamble::control().map(BlockTree::Control).boxed(),
        BlockKind::CascadeStart => cascade::cascade_start()
            .map(BlockTree::CascadeStart)
            .boxed(),
        BlockKind::Primary => cascade::primary().map(BlockTree::Primary).boxed(),
        BlockKind::Summary => cascade::summary().map(BlockTree::Summary).boxed(),
        BlockKind::LatticeSites => defects::lattice_sites()
            .map(BlockTree::LatticeSites)
            .boxed(),
        BlockKind::Ranges => defects::ranges().map(BlockTree::Ranges).boxed(),
        BlockKind::Sequences => defects::sequences().map(BlockTree::Sequences).boxed(),
        BlockKind::DistantPairs => defects::distant_pairs()
            .map(BlockTree::DistantPairs)
            .boxed(),
        BlockKind::ReportAtoms => cascade::report_atoms()
            .map(BlockTree::ReportAtoms)
            .boxed(),
        BlockKind::DetailPart1 => detail::part1().map(BlockTree::DetailPart1).boxed(),
        BlockKind::DetailPart2 => detail::part2().map(BlockTree::DetailPart2).boxed(),
        BlockKind::DetailPart3 => detail::part3().map(BlockTree::DetailPart3).boxed(),
        BlockKind::CascadeEnd => cascade::cascade_end().map(BlockTree::CascadeEnd).boxed(),
        BlockKind::FinalSummary => cascade::final_summary()
            .map(BlockTree::FinalSummary)
            .boxed(),
        BlockKind::Moments => statistics::moments().map(BlockTree::Moments).boxed(),
        BlockKind::Histogram => statistics::histogram().map(BlockTree::Histogram).boxed(),
        BlockKind::ElementStats => statistics::element_stats()
            .map(BlockTree::ElementStats)
            .boxed(),
        BlockKind::RunEnd => statistics::run_end().map(BlockTree::RunEnd).boxed(),
    };
    grammar.then_ignore(end()).boxed()
}

/// Parse one block's text with a freshly built grammar.
///
/// Error lines are relative to `text`, starting at 1, and the error carries no cascade index.
pub fn parse_block(kind: BlockKind, text: &str) -> Result<BlockTree, BlockError> {
    run(&grammar_for(kind), kind, text)
}

/// Reusable parser for a sequence of blocks.
pub struct BlockParser {
    mode: ParserMode,
    pool: HashMap<BlockKind, Terminal<BlockTree>>,
}

impl BlockParser {
    pub fn new(mode: ParserMode) -> Self {
        BlockParser {
            mode,
            pool: HashMap::new(),
        }
    }

    pub fn mode(&self) -> ParserMode {
        self.mode
    }

    /// Parse a separated block, locating errors by absolute input line.
    pub fn parse(&mut self, block: &Block) -> Result<BlockTree, BlockError> {
        let text = block.text();
        let result = match self.mode {
            ParserMode::Fresh => parse_block(block.kind, &text),
            ParserMode::Pooled => {
                let grammar = self
                    .pool
                    .entry(block.kind)
                    .or_insert_with(|| grammar_for(block.kind));
                run(grammar, block.kind, &text)
            }
        };
        result.map_err(|err| err.located(block))
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        BlockParser::new(ParserMode::default())
    }
}

fn run(grammar: &Terminal<BlockTree>, kind: BlockKind, text: &str) -> Result<BlockTree, BlockError> {
    grammar
        .parse(text)
        .map_err(|errors| mismatch(kind, text, &errors))
}

fn mismatch(kind: BlockKind, text: &str, errors: &[ParseError]) -> BlockError {
    let (line, message) = match errors.first() {
        Some(error) => {
            let offset = error.span().start;
            let line = 1 + text.chars().take(offset).filter(|c| *c == '\n').count();
            (line, describe(error))
        }
        None => (1, "no parse".to_string()),
    };
    BlockError {
        kind,
        index: None,
        line,
        message,
    }
}

fn describe(error: &ParseError) -> String {
    if let SimpleReason::Custom(message) = error.reason() {
        return message.clone();
    }
    let found = match error.found() {
        Some(&'\n') => "end of line".to_string(),
        Some(c) => format!("{c:?}"),
        None => "end of block".to_string(),
    };
    match error.label() {
        Some(label) => format!("unexpected {found}, expected {label}"),
        None => format!("unexpected {found}"),
    }
}

impl BlockError {
    /// Rebase a relative error onto the block's position in the input.
    ///
    /// Blank lines and page headers inside a block never reach the grammar, so the relative line
    /// is mapped through the block's own lines. A failure at end of block reports its last line.
    pub(crate) fn located(mut self, block: &Block) -> Self {
        let relative = self.line.saturating_sub(1);
        self.index = block.index;
        self.line = block
            .lines()
            .nth(relative)
            .or_else(|| block.lines().last())
            .map_or(block.start_line(), |line| line.number);
        self
    }
}

/// A fixed header line.
pub(crate) fn header(text: &'static str) -> Terminal<()> {
    line(text)
}

/// Zero or more rows, each ending its line.
pub(crate) fn rows<O: 'static>(row: Terminal<O>) -> Terminal<Vec<O>> {
    row.then_ignore(eol()).repeated().boxed()
}

/// One or more rows, each ending its line.
pub(crate) fn rows1<O: 'static>(row: Terminal<O>) -> Terminal<Vec<O>> {
    row.then_ignore(eol()).repeated().at_least(1).boxed()
}
