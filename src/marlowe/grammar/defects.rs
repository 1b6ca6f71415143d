//! Defect report grammars. Each is a start line, a fixed column header and zero or more rows.

use chumsky::prelude::*;

use super::{header, rows};
use crate::marlowe::terms::labels::SITE_STATES;
use crate::marlowe::terms::{blank, element, float, float3, int, label, Terminal};

#[derive(Debug, Clone, PartialEq)]
pub struct LatticeSite {
    pub site: i64,
    pub kind: i64,
    pub symbol: &'static str,
    pub position: [f64; 3],
    pub state: &'static str,
    /// File index of the atom occupying or displaced from the site; 0 when none.
    pub interstitial: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoilRange {
    pub file: i64,
    pub symbol: &'static str,
    pub path_length: f64,
    pub projected: f64,
    pub lateral: f64,
    pub penetration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub sequence: i64,
    pub length: i64,
    pub start_site: i64,
    pub end_site: i64,
    pub direction: [i64; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistantPair {
    pub pair: i64,
    pub vacancy_site: i64,
    pub interstitial: i64,
    pub separation: f64,
}

pub fn lattice_sites() -> Terminal<Vec<LatticeSite>> {
    let row = int(6)
        .then(int(4))
        .then(element())
        .then(float3())
        .then(label(SITE_STATES))
        .then(int(6))
        .map(
            |(((((site, kind), symbol), position), state), interstitial)| LatticeSite {
                site,
                kind,
                symbol,
                position,
                state,
                interstitial,
            },
        )
        .boxed();
    header("Lattice Site Report")
        .ignore_then(header("Site Kind Symbol X Y Z State Interstitial"))
        .ignore_then(rows(row))
        .boxed()
}

pub fn ranges() -> Terminal<Vec<RecoilRange>> {
    let row = int(6)
        .then(element())
        .then(float())
        .then(float())
        .then(float())
        .then(float())
        .map(
            |(((((file, symbol), path_length), projected), lateral), penetration)| RecoilRange {
                file,
                symbol,
                path_length,
                projected,
                lateral,
                penetration,
            },
        )
        .boxed();
    header("Recoil Ranges")
        .ignore_then(header(
            "File Symbol Path Length Projected Range Lateral Spread Penetration",
        ))
        .ignore_then(rows(row))
        .boxed()
}

/// A crystal direction printed as `<h k l>`.
fn miller() -> Terminal<[i64; 3]> {
    blank()
        .ignore_then(just('<'))
        .ignore_then(int(3))
        .then(int(3))
        .then(int(3))
        .then_ignore(blank())
        .then_ignore(just('>'))
        .map(|((h, k), l)| [h, k, l])
        .boxed()
}

pub fn sequences() -> Terminal<Vec<Sequence>> {
    let row = int(6)
        .then(int(4))
        .then(int(6))
        .then(int(6))
        .then(miller())
        .map(
            |((((sequence, length), start_site), end_site), direction)| Sequence {
                sequence,
                length,
                start_site,
                end_site,
                direction,
            },
        )
        .boxed();
    header("Replacement Sequences")
        .ignore_then(header("Sequence Length Start Site End Site Direction"))
        .ignore_then(rows(row))
        .boxed()
}

pub fn distant_pairs() -> Terminal<Vec<DistantPair>> {
    let row = int(6)
        .then(int(6))
        .then(int(6))
        .then(float())
        .map(|(((pair, vacancy_site), interstitial), separation)| DistantPair {
            pair,
            vacancy_site,
            interstitial,
            separation,
        })
        .boxed();
    header("Distant Frenkel Pairs")
        .ignore_then(header("Pair Vacancy Site Interstitial Separation"))
        .ignore_then(rows(row))
        .boxed()
}
