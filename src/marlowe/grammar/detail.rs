//! Detailed description of every moving atom, printed in three parts keyed by file index.

use chumsky::prelude::*;

use super::{header, rows};
use crate::marlowe::terms::labels::ATOM_STATUSES;
use crate::marlowe::terms::{element, float, float3, int, label, Terminal};

/// Part 1: identity and genealogy.
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    pub file: i64,
    pub kind: i64,
    pub symbol: &'static str,
    pub generation: i64,
    pub collisions: i64,
    pub energy: f64,
}

/// Part 2: where the atom started moving.
#[derive(Debug, Clone, PartialEq)]
pub struct Launch {
    pub file: i64,
    pub position: [f64; 3],
    pub direction: [f64; 3],
}

/// Part 3: where it ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct Fate {
    pub file: i64,
    pub position: [f64; 3],
    pub energy: f64,
    pub status: &'static str,
}

pub fn part1() -> Terminal<Vec<Origin>> {
    let row = int(6)
        .then(int(4))
        .then(element())
        .then(int(4))
        .then(int(8))
        .then(float())
        .map(
            |(((((file, kind), symbol), generation), collisions), energy)| Origin {
                file,
                kind,
                symbol,
                generation,
                collisions,
                energy,
            },
        )
        .boxed();
    header("Detailed Description, Part 1")
        .ignore_then(header(
            "File Kind Symbol Generation Collisions Initial Energy",
        ))
        .ignore_then(rows(row))
        .boxed()
}

pub fn part2() -> Terminal<Vec<Launch>> {
    let row = int(6)
        .then(float3())
        .then(float3())
        .map(|((file, position), direction)| Launch {
            file,
            position,
            direction,
        })
        .boxed();
    header("Detailed Description, Part 2")
        .ignore_then(header("File Initial Position Initial Direction"))
        .ignore_then(rows(row))
        .boxed()
}

pub fn part3() -> Terminal<Vec<Fate>> {
    let row = int(6)
        .then(float3())
        .then(float())
        .then(label(ATOM_STATUSES))
        .map(|(((file, position), energy), status)| Fate {
            file,
            position,
            energy,
            status,
        })
        .boxed();
    header("Detailed Description, Part 3")
        .ignore_then(header("File Final Position Final Energy Status"))
        .ignore_then(rows(row))
        .boxed()
}
