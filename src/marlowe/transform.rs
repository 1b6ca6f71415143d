//! Block Transformers
//!
//! Walk a parsed [`BlockTree`] and build its [`Record`]. Keys are the labels as printed by the
//! simulator, so downstream code can address any value by report text. Typed trees already hold
//! typed numbers; transformers only arrange them and check the few cross-field facts a grammar
//! cannot see (an element's atomic number, a cascade end marker matching its cascade).
//!
//! Transform never fails. Suspicious but well-formed input is logged and kept as printed.

mod cascade;
mod defects;
mod detail;
mod preamble;
mod statistics;

use serde_json::{Map, Value};

use crate::marlowe::context::CascadeIndex;
use crate::marlowe::grammar::BlockTree;
use crate::marlowe::record::{into_record, Record};

/// What a transformer may know about where its block came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformContext {
    /// The active cascade, for cascade-scoped blocks.
    pub index: Option<CascadeIndex>,
    /// Input line of the block's boundary line.
    pub line: usize,
}

impl TransformContext {
    pub fn new(index: Option<CascadeIndex>, line: usize) -> Self {
        TransformContext { index, line }
    }
}

pub fn transform(tree: BlockTree, ctx: &TransformContext) -> Record {
    let value = match tree {
        BlockTree::Banner(banner) => preamble::banner(banner),
        BlockTree::Title(title) => preamble::title(title),
        BlockTree::Crystal(crystal) => preamble::crystal(crystal),
        BlockTree::Components(rows) => preamble::components(rows, ctx),
        BlockTree::Potentials(rows) => preamble::potentials(rows),
        BlockTree::Inelastic(inelastic) => preamble::inelastic(inelastic),
        BlockTree::Surface(surface) => preamble::surface(surface),
        BlockTree::Beam(beam) => preamble::beam(beam),
        BlockTree::Control(entries) => preamble::control(entries),
        BlockTree::CascadeStart(start) => cascade::cascade_start(start),
        BlockTree::Primary(primary) => cascade::primary(primary),
        BlockTree::Summary(tallies) => cascade::tallies("Summary", tallies),
        BlockTree::LatticeSites(rows) => defects::lattice_sites(rows),
        BlockTree::Ranges(rows) => defects::ranges(rows),
        BlockTree::Sequences(rows) => defects::sequences(rows),
        BlockTree::DistantPairs(rows) => defects::distant_pairs(rows),
        BlockTree::ReportAtoms(report) => cascade::report_atoms(report),
        BlockTree::DetailPart1(rows) => detail::part1(rows),
        BlockTree::DetailPart2(rows) => detail::part2(rows),
        BlockTree::DetailPart3(rows) => detail::part3(rows),
        BlockTree::CascadeEnd(number) => cascade::cascade_end(number, ctx),
        BlockTree::FinalSummary(tallies) => cascade::tallies("Final Summary", tallies),
        BlockTree::Moments(moments) => statistics::moments(moments),
        BlockTree::Histogram(histogram) => statistics::histogram(histogram),
        BlockTree::ElementStats(stats) => statistics::element_stats(stats),
        BlockTree::RunEnd(end) => statistics::run_end(end),
    };
    into_record(value)
}

/// Build an object from label/value pairs, keeping their order.
pub(crate) fn labelled<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Value
where
    K: Into<String>,
    V: Into<Value>,
{
    let map: Map<String, Value> = pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect();
    Value::Object(map)
}
