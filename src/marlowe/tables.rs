//! Fixed-schema tables
//!
//! Every table starts with the cascade index columns, followed by columns read from one sequence
//! of the finalized cascade document. Schemas never change shape: a missing value is written as
//! [`MISSING`], never dropped and never zero.

use serde_json::Value;

use crate::marlowe::context::CascadeIndex;
use crate::marlowe::record::Record;

/// Cell text for an absent value.
pub const MISSING: &str = "NA";

pub const INDEX_COLUMNS: [&str; 3] = ["Cascade", "Group", "Number"];

/// Where a column's value lives in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Key(&'static str),
    /// Element `n` of an array-valued key.
    Item(&'static str, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub source: Source,
}

const fn key(name: &'static str) -> Column {
    Column {
        name,
        source: Source::Key(name),
    }
}

const fn item(name: &'static str, key: &'static str, n: usize) -> Column {
    Column {
        name,
        source: Source::Item(key, n),
    }
}

const LATTICE_SITES: &[Column] = &[
    key("Site"),
    key("Kind"),
    key("Symbol"),
    item("X", "Position", 0),
    item("Y", "Position", 1),
    item("Z", "Position", 2),
    key("State"),
    key("Interstitial"),
    item("Interstitial X", "Interstitial Position", 0),
    item("Interstitial Y", "Interstitial Position", 1),
    item("Interstitial Z", "Interstitial Position", 2),
    key("Separation"),
];

const DETAIL: &[Column] = &[
    key("File"),
    key("Kind"),
    key("Symbol"),
    key("Generation"),
    key("Collisions"),
    key("Initial Energy"),
    item("Initial X", "Initial Position", 0),
    item("Initial Y", "Initial Position", 1),
    item("Initial Z", "Initial Position", 2),
    item("Direction X", "Initial Direction", 0),
    item("Direction Y", "Initial Direction", 1),
    item("Direction Z", "Initial Direction", 2),
    item("Final X", "Final Position", 0),
    item("Final Y", "Final Position", 1),
    item("Final Z", "Final Position", 2),
    key("Final Energy"),
    key("Status"),
];

const DISTANT_PAIRS: &[Column] = &[
    key("Pair"),
    key("Vacancy Site"),
    key("Interstitial"),
    key("Separation"),
    item("Interstitial X", "Interstitial Position", 0),
    item("Interstitial Y", "Interstitial Position", 1),
    item("Interstitial Z", "Interstitial Position", 2),
];

const RANGES: &[Column] = &[
    key("File"),
    key("Symbol"),
    key("Path Length"),
    key("Projected Range"),
    key("Lateral Spread"),
    key("Penetration"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    LatticeSites,
    Detail,
    DistantPairs,
    Ranges,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::LatticeSites,
        TableKind::Detail,
        TableKind::DistantPairs,
        TableKind::Ranges,
    ];

    pub fn stem(self) -> &'static str {
        match self {
            TableKind::LatticeSites => "lattice_sites",
            TableKind::Detail => "detail",
            TableKind::DistantPairs => "distant_pairs",
            TableKind::Ranges => "ranges",
        }
    }

    /// Per-cascade file name.
    pub fn file_name(self) -> String {
        format!("{}.csv", self.stem())
    }

    /// Run-wide file name.
    pub fn bundled_file_name(self) -> String {
        format!("{}_all.csv", self.stem())
    }

    /// Document key of the sequence this table flattens.
    pub fn source_key(self) -> &'static str {
        match self {
            TableKind::LatticeSites => "Lattice Sites",
            TableKind::Detail => "Detail",
            TableKind::DistantPairs => "Distant Pairs",
            TableKind::Ranges => "Ranges",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            TableKind::LatticeSites => LATTICE_SITES,
            TableKind::Detail => DETAIL,
            TableKind::DistantPairs => DISTANT_PAIRS,
            TableKind::Ranges => RANGES,
        }
    }

    pub fn header(self) -> Vec<&'static str> {
        INDEX_COLUMNS
            .iter()
            .copied()
            .chain(self.columns().iter().map(|column| column.name))
            .collect()
    }

    /// Rows for one cascade; empty when the cascade lacks the source sequence.
    pub fn rows(self, index: CascadeIndex, document: &Record) -> Vec<Vec<String>> {
        let Some(Value::Array(items)) = document.get(self.source_key()) else {
            return Vec::new();
        };
        items
            .iter()
            .map(|item| {
                let mut row = vec![
                    index.cascade.to_string(),
                    index.group.to_string(),
                    index.number.to_string(),
                ];
                row.extend(self.columns().iter().map(|column| cell(lookup(item, column))));
                row
            })
            .collect()
    }
}

fn lookup<'a>(item: &'a Value, column: &Column) -> Option<&'a Value> {
    match column.source {
        Source::Key(key) => item.get(key),
        Source::Item(key, n) => item.get(key)?.get(n),
    }
}

/// Render one value as cell text.
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(true)) => "Yes".to_string(),
        Some(Value::Bool(false)) => "No".to_string(),
        Some(other) => other.to_string(),
    }
}
