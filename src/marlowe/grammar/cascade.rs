//! Cascade framing grammars: the boundary block, the primary recoil, the per-cascade summary,
//! the report-atom counts and the end marker. The run-wide final summary shares the tally row.

use chumsky::prelude::*;

use super::{header, rows1};
use crate::marlowe::terms::labels::{FINAL_SUMMARY_LABELS, INITIAL_LABELS, SUMMARY_LABELS};
use crate::marlowe::terms::{
    blank, element, eol, float, float3, int, label, number, phrase, Number, Terminal,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CascadeStart {
    pub cascade: i64,
    pub group: i64,
    pub number: i64,
    /// Initial-count labels paired with their values, in column order.
    pub initial: Vec<(&'static str, i64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primary {
    pub symbol: &'static str,
    pub energy: f64,
    pub start: [f64; 3],
    pub direction: [f64; 3],
}

/// One `<label> <number>` summary line.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    pub label: &'static str,
    pub value: Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportAtoms {
    pub atoms: i64,
    pub moving: i64,
    pub stopped: i64,
}

/// `Cascade n: Group n Number n`, the `Initial` header pair and the row of initial counts.
pub fn cascade_start() -> Terminal<CascadeStart> {
    let boundary = phrase("Cascade")
        .ignore_then(int(6))
        .then_ignore(blank())
        .then_ignore(just(':'))
        .then_ignore(phrase("Group"))
        .then(int(6))
        .then_ignore(phrase("Number"))
        .then(int(6))
        .then_ignore(eol());
    let initial_words = phrase("Initial").repeated().at_least(1).then_ignore(eol());
    let labels = label(INITIAL_LABELS)
        .repeated()
        .at_least(1)
        .then_ignore(eol());
    let counts = int(6).repeated().at_least(1).then_ignore(eol());
    boundary
        .then(initial_words)
        .then(labels)
        .then(counts)
        .try_map(|(((((cascade, group), number), words), labels), counts), span| {
            if words.len() != labels.len() || labels.len() != counts.len() {
                return Err(Simple::custom(
                    span,
                    format!(
                        "initial header has {} words and {} labels but {} counts",
                        words.len(),
                        labels.len(),
                        counts.len()
                    ),
                ));
            }
            Ok(CascadeStart {
                cascade,
                group,
                number,
                initial: labels.into_iter().zip(counts).collect(),
            })
        })
        .boxed()
}

pub fn primary() -> Terminal<Primary> {
    phrase("Primary Recoil:")
        .ignore_then(element())
        .then_ignore(eol())
        .then_ignore(phrase("Energy"))
        .then(float())
        .then_ignore(phrase("eV"))
        .then_ignore(eol())
        .then_ignore(phrase("Start Position"))
        .then(float3())
        .then_ignore(eol())
        .then_ignore(phrase("Direction"))
        .then(float3())
        .then_ignore(eol())
        .map(|(((symbol, energy), start), direction)| Primary {
            symbol,
            energy,
            start,
            direction,
        })
        .boxed()
}

fn tally(set: &'static [&'static str]) -> Terminal<Tally> {
    label(set)
        .then(number())
        .map(|(label, value)| Tally { label, value })
        .boxed()
}

pub fn summary() -> Terminal<Vec<Tally>> {
    header("Cascade Summary")
        .ignore_then(rows1(tally(SUMMARY_LABELS)))
        .boxed()
}

pub fn final_summary() -> Terminal<Vec<Tally>> {
    header("Summary of All Cascades")
        .ignore_then(rows1(tally(FINAL_SUMMARY_LABELS)))
        .boxed()
}

/// `Report Atoms n Moving n Stopped n`
pub fn report_atoms() -> Terminal<ReportAtoms> {
    phrase("Report Atoms")
        .ignore_then(int(6))
        .then_ignore(phrase("Moving"))
        .then(int(6))
        .then_ignore(phrase("Stopped"))
        .then(int(6))
        .then_ignore(eol())
        .map(|((atoms, moving), stopped)| ReportAtoms {
            atoms,
            moving,
            stopped,
        })
        .boxed()
}

pub fn cascade_end() -> Terminal<i64> {
    phrase("End of Cascade")
        .ignore_then(int(6))
        .then_ignore(eol())
        .boxed()
}
