//! Block Separator
//!
//!     The state machine that cuts the normalized line stream into typed blocks.
//!
//!     The state is the kind of the block being accumulated (nothing before the banner). For each
//!     line, only the candidates of the current state are tested, in table order:
//!         - a match exits the current block, which is returned, and the line is held so the next
//!           pull opens the new block with it
//!         - no match appends the line to the current block
//!     At end of input the open block is exited and returned, then the iterator is done.
//!
//!     Lines that match no candidate accumulate without limit. Under
//!     [`TransitionPolicy::Strict`] a line that opens some other known kind is an error instead.

use std::io::BufRead;
use tracing::{debug, warn};

use crate::marlowe::context::CascadeIndex;
use crate::marlowe::error::{ConvertError, Result};
use crate::marlowe::kinds::{classify, transition, BlockKind, Scope, CASCADE_START};
use crate::marlowe::lines::{LineReader, RawLine};
use crate::marlowe::options::TransitionPolicy;

/// One report section: its boundary line and every line up to the next boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    /// The cascade this block belongs to, for cascade-scoped kinds.
    pub index: Option<CascadeIndex>,
    pub head: RawLine,
    pub body: Vec<RawLine>,
}

impl Block {
    pub fn start_line(&self) -> usize {
        self.head.number
    }

    pub fn lines(&self) -> impl Iterator<Item = &RawLine> {
        std::iter::once(&self.head).chain(self.body.iter())
    }

    /// The block as grammar input: stripped lines, each terminated by `\n`.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in self.lines() {
            text.push_str(&line.text);
            text.push('\n');
        }
        text
    }
}

/// Read the index triple from a cascade boundary line.
pub fn cascade_index(line: &str) -> Option<CascadeIndex> {
    let captures = CASCADE_START.captures(line)?;
    let field = |group: usize| -> Option<u32> { captures.get(group)?.as_str().parse().ok() };
    Some(CascadeIndex::new(field(1)?, field(2)?, field(3)?))
}

/// Open a block of `kind` on its boundary line.
///
/// Cascade boundaries carry their own index; other cascade-scoped kinds inherit `active`.
pub fn enter(kind: BlockKind, line: RawLine, active: Option<CascadeIndex>) -> Block {
    let index = match kind {
        BlockKind::CascadeStart => {
            let index = cascade_index(&line.text);
            if index.is_none() {
                warn!(line = line.number, "cascade index out of range");
            }
            index
        }
        _ if kind.scope() == Scope::Cascade => active,
        _ => None,
    };
    Block {
        kind,
        index,
        head: line,
        body: Vec::new(),
    }
}

pub fn accumulate(block: &mut Block, line: RawLine) {
    block.body.push(line);
}

/// Iterator of blocks over a report.
pub struct BlockSeparator<R> {
    lines: LineReader<R>,
    policy: TransitionPolicy,
    current: Option<Block>,
    /// Kind to open with the held line on the next pull.
    pending: Option<BlockKind>,
    active: Option<CascadeIndex>,
    finished: bool,
}

impl<R: BufRead> BlockSeparator<R> {
    pub fn new(reader: R, policy: TransitionPolicy) -> Self {
        BlockSeparator::from_lines(LineReader::new(reader), policy)
    }

    pub fn from_lines(lines: LineReader<R>, policy: TransitionPolicy) -> Self {
        BlockSeparator {
            lines,
            policy,
            current: None,
            pending: None,
            active: None,
            finished: false,
        }
    }

    /// Kind of the block being accumulated.
    pub fn state(&self) -> Option<BlockKind> {
        self.current.as_ref().map(|block| block.kind)
    }

    /// Raw input lines read so far.
    pub fn consumed(&self) -> usize {
        self.lines.consumed()
    }

    fn open(&mut self, kind: BlockKind, line: RawLine) {
        let block = enter(kind, line, self.active);
        if kind == BlockKind::CascadeStart {
            self.active = block.index;
        }
        debug!(%kind, line = block.start_line(), "block opened");
        self.current = Some(block);
    }

    fn step(&mut self, line: RawLine) -> Result<Option<Block>> {
        if let Some(kind) = self.pending.take() {
            self.open(kind, line);
            return Ok(None);
        }
        let state = self.state();
        if let Some(next) = transition(state, &line.text) {
            return Ok(match self.current.take() {
                Some(exited) => {
                    self.pending = Some(next);
                    self.lines.hold();
                    Some(exited)
                }
                None => {
                    self.open(next, line);
                    None
                }
            });
        }
        if self.policy == TransitionPolicy::Strict {
            if let Some(found) = classify(&line.text) {
                return Err(ConvertError::UnexpectedBlock {
                    line: line.number,
                    found,
                    state,
                });
            }
        }
        match self.current.as_mut() {
            Some(block) => accumulate(block, line),
            None => debug!(line = line.number, "text before the banner dropped"),
        }
        Ok(None)
    }
}

impl<'a> BlockSeparator<std::io::Cursor<&'a [u8]>> {
    pub fn from_text(text: &'a str, policy: TransitionPolicy) -> Self {
        BlockSeparator::from_lines(LineReader::from_text(text), policy)
    }
}

impl<R: BufRead> Iterator for BlockSeparator<R> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(ConvertError::Read(err)));
                }
                None => {
                    self.finished = true;
                    return self.current.take().map(Ok);
                }
            };
            match self.step(line) {
                Ok(Some(block)) => return Some(Ok(block)),
                Ok(None) => continue,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Lines of a block that look like the start of another kind, for diagnostics.
pub fn suspicious_lines(block: &Block) -> Vec<&RawLine> {
    block
        .body
        .iter()
        .filter(|line| classify(&line.text).is_some())
        .collect()
}
