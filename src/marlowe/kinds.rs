//! Block kinds and the transition table
//!
//! A MARLOWE report is a fixed sequence of sections. Each section kind has a start rule (the
//! line that opens it) and an ordered list of kinds that may legally follow it. The separator only
//! ever tests the candidates of its current state, in the order listed here, so the table is both
//! the report grammar and the disambiguation policy: `Cascade Summary` is never mistaken for a
//! cascade boundary because the boundary pattern is only tried where a new cascade may begin.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Matches a cascade boundary line, capturing the three index fields.
pub(crate) static CASCADE_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Cascade\s+(\d+)\s*:\s+Group\s+(\d+)\s+Number\s+(\d+)\s*$").unwrap()
});

static CASCADE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"^End of Cascade\s+\d+\s*$").unwrap());

/// Every section of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    // Run preamble
    Banner,
    Title,
    Crystal,
    Components,
    Potentials,
    Inelastic,
    Surface,
    Beam,
    Control,
    // One cascade
    CascadeStart,
    Primary,
    Summary,
    LatticeSites,
    Ranges,
    Sequences,
    DistantPairs,
    ReportAtoms,
    DetailPart1,
    DetailPart2,
    DetailPart3,
    CascadeEnd,
    // Run statistics
    FinalSummary,
    Moments,
    Histogram,
    ElementStats,
    RunEnd,
}

/// How a kind recognizes its opening line.
#[derive(Debug, Clone, Copy)]
pub enum StartRule {
    /// The whole stripped line.
    Line(&'static str),
    /// The beginning of the stripped line.
    Prefix(&'static str),
    /// An anchored pattern over the whole line.
    Pattern(&'static Lazy<Regex>),
}

impl StartRule {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            StartRule::Line(text) => line == *text,
            StartRule::Prefix(prefix) => line.starts_with(prefix),
            StartRule::Pattern(regex) => regex.is_match(line),
        }
    }
}

/// Which context a block's record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Run,
    Cascade,
}

impl BlockKind {
    pub const ALL: [BlockKind; 26] = [
        BlockKind::Banner,
        BlockKind::Title,
        BlockKind::Crystal,
        BlockKind::Components,
        BlockKind::Potentials,
        BlockKind::Inelastic,
        BlockKind::Surface,
        BlockKind::Beam,
        BlockKind::Control,
        BlockKind::CascadeStart,
        BlockKind::Primary,
        BlockKind::Summary,
        BlockKind::LatticeSites,
        BlockKind::Ranges,
        BlockKind::Sequences,
        BlockKind::DistantPairs,
        BlockKind::ReportAtoms,
        BlockKind::DetailPart1,
        BlockKind::DetailPart2,
        BlockKind::DetailPart3,
        BlockKind::CascadeEnd,
        BlockKind::FinalSummary,
        BlockKind::Moments,
        BlockKind::Histogram,
        BlockKind::ElementStats,
        BlockKind::RunEnd,
    ];

    /// Snake-case name, used in diagnostics and raw dump file names.
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Banner => "banner",
            BlockKind::Title => "title",
            BlockKind::Crystal => "crystal",
            BlockKind::Components => "components",
            BlockKind::Potentials => "potentials",
            BlockKind::Inelastic => "inelastic",
            BlockKind::Surface => "surface",
            BlockKind::Beam => "beam",
            BlockKind::Control => "control",
            BlockKind::CascadeStart => "cascade_start",
            BlockKind::Primary => "primary",
            BlockKind::Summary => "summary",
            BlockKind::LatticeSites => "lattice_sites",
            BlockKind::Ranges => "ranges",
            BlockKind::Sequences => "sequences",
            BlockKind::DistantPairs => "distant_pairs",
            BlockKind::ReportAtoms => "report_atoms",
            BlockKind::DetailPart1 => "detail_part1",
            BlockKind::DetailPart2 => "detail_part2",
            BlockKind::DetailPart3 => "detail_part3",
            BlockKind::CascadeEnd => "cascade_end",
            BlockKind::FinalSummary => "final_summary",
            BlockKind::Moments => "moments",
            BlockKind::Histogram => "histogram",
            BlockKind::ElementStats => "element_stats",
            BlockKind::RunEnd => "run_end",
        }
    }

    pub fn start_rule(self) -> StartRule {
        use StartRule::*;
        match self {
            BlockKind::Banner => Prefix("Program MARLOWE"),
            BlockKind::Title => Prefix("Title:"),
            BlockKind::Crystal => Prefix("Crystal Structure:"),
            BlockKind::Components => Line("Target Components"),
            BlockKind::Potentials => Line("Interatomic Potentials"),
            BlockKind::Inelastic => Prefix("Inelastic Energy Loss:"),
            BlockKind::Surface => Prefix("Target Surface:"),
            BlockKind::Beam => Prefix("Primary Particle:"),
            BlockKind::Control => Line("Run Control"),
            BlockKind::CascadeStart => Pattern(&CASCADE_START),
            BlockKind::Primary => Prefix("Primary Recoil:"),
            BlockKind::Summary => Line("Cascade Summary"),
            BlockKind::LatticeSites => Line("Lattice Site Report"),
            BlockKind::Ranges => Line("Recoil Ranges"),
            BlockKind::Sequences => Line("Replacement Sequences"),
            BlockKind::DistantPairs => Line("Distant Frenkel Pairs"),
            BlockKind::ReportAtoms => Prefix("Report Atoms"),
            BlockKind::DetailPart1 => Line("Detailed Description, Part 1"),
            BlockKind::DetailPart2 => Line("Detailed Description, Part 2"),
            BlockKind::DetailPart3 => Line("Detailed Description, Part 3"),
            BlockKind::CascadeEnd => Pattern(&CASCADE_END),
            BlockKind::FinalSummary => Line("Summary of All Cascades"),
            BlockKind::Moments => Line("Moments of Distributions"),
            BlockKind::Histogram => Prefix("Histogram:"),
            BlockKind::ElementStats => Line("Statistics by Element"),
            BlockKind::RunEnd => Line("End of Run"),
        }
    }

    /// Does `line` open a block of this kind?
    pub fn matches(self, line: &str) -> bool {
        self.start_rule().matches(line)
    }

    pub fn scope(self) -> Scope {
        match self {
            BlockKind::CascadeStart
            | BlockKind::Primary
            | BlockKind::Summary
            | BlockKind::LatticeSites
            | BlockKind::Ranges
            | BlockKind::Sequences
            | BlockKind::DistantPairs
            | BlockKind::ReportAtoms
            | BlockKind::DetailPart1
            | BlockKind::DetailPart2
            | BlockKind::DetailPart3
            | BlockKind::CascadeEnd => Scope::Cascade,
            _ => Scope::Run,
        }
    }

    /// Kinds that may follow this one, in priority order.
    pub fn successors(self) -> &'static [BlockKind] {
        use BlockKind::*;
        match self {
            Banner => &[Title],
            Title => &[Crystal],
            Crystal => &[Components],
            Components => &[Potentials],
            Potentials => &[Inelastic, Surface, Beam],
            Inelastic => &[Surface, Beam],
            Surface => &[Beam],
            Beam => &[Control],
            Control => &[CascadeStart, FinalSummary],
            CascadeStart => &[Primary],
            Primary => &[Summary],
            Summary => &[
                LatticeSites,
                Ranges,
                Sequences,
                DistantPairs,
                ReportAtoms,
                CascadeEnd,
            ],
            LatticeSites => &[Ranges, Sequences, DistantPairs, ReportAtoms, CascadeEnd],
            Ranges => &[Sequences, DistantPairs, ReportAtoms, CascadeEnd],
            Sequences => &[DistantPairs, ReportAtoms, CascadeEnd],
            DistantPairs => &[ReportAtoms, CascadeEnd],
            ReportAtoms => &[DetailPart1, CascadeEnd],
            DetailPart1 => &[DetailPart2],
            DetailPart2 => &[DetailPart3],
            DetailPart3 => &[CascadeEnd],
            CascadeEnd => &[CascadeStart, FinalSummary],
            FinalSummary => &[Moments, Histogram, ElementStats, RunEnd],
            Moments => &[Histogram, ElementStats, RunEnd],
            Histogram => &[Histogram, ElementStats, RunEnd],
            ElementStats => &[RunEnd],
            RunEnd => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Candidates offered from `state`; `None` is the state before the first block.
pub fn candidates(state: Option<BlockKind>) -> &'static [BlockKind] {
    match state {
        Some(kind) => kind.successors(),
        None => &[BlockKind::Banner],
    }
}

/// First candidate reachable from `state` whose start rule matches `line`.
pub fn transition(state: Option<BlockKind>, line: &str) -> Option<BlockKind> {
    candidates(state)
        .iter()
        .copied()
        .find(|kind| kind.matches(line))
}

/// Any kind at all whose start rule matches `line`, regardless of state.
pub fn classify(line: &str) -> Option<BlockKind> {
    BlockKind::ALL.iter().copied().find(|kind| kind.matches(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Program MARLOWE, Version 15b", BlockKind::Banner)]
    #[case("Title: Cu in Cu", BlockKind::Title)]
    #[case("Cascade     1:     Group    1     Number    1", BlockKind::CascadeStart)]
    #[case("Cascade Summary", BlockKind::Summary)]
    #[case("End of Cascade     12", BlockKind::CascadeEnd)]
    #[case("Histogram: Projected Range", BlockKind::Histogram)]
    #[case("Detailed Description, Part 2", BlockKind::DetailPart2)]
    #[case("End of Run", BlockKind::RunEnd)]
    fn classifies_start_lines(#[case] line: &str, #[case] expected: BlockKind) {
        assert_eq!(classify(line), Some(expected));
    }

    #[test]
    fn cascade_summary_is_not_a_boundary() {
        assert!(!BlockKind::CascadeStart.matches("Cascade Summary"));
        assert!(!BlockKind::CascadeStart.matches("Cascades Completed     2"));
    }

    #[test]
    fn data_rows_classify_as_nothing() {
        assert_eq!(classify("1    1    Cu    1.8075"), None);
        assert_eq!(classify("Collisions     1234"), None);
    }

    #[test]
    fn only_banner_opens_a_report() {
        assert_eq!(transition(None, "Title: x"), None);
        assert_eq!(
            transition(None, "Program MARLOWE, Version 15b"),
            Some(BlockKind::Banner)
        );
    }

    #[test]
    fn report_atoms_branches_on_detailed_reporting() {
        let state = Some(BlockKind::ReportAtoms);
        assert_eq!(
            transition(state, "Detailed Description, Part 1"),
            Some(BlockKind::DetailPart1)
        );
        assert_eq!(
            transition(state, "End of Cascade 1"),
            Some(BlockKind::CascadeEnd)
        );
        assert_eq!(transition(state, "Recoil Ranges"), None);
    }

    #[test]
    fn histograms_repeat() {
        assert_eq!(
            transition(Some(BlockKind::Histogram), "Histogram: Final Vacant Sites"),
            Some(BlockKind::Histogram)
        );
    }

    #[test]
    fn every_kind_is_reachable_from_the_start() {
        let mut seen = vec![BlockKind::Banner];
        let mut frontier = vec![BlockKind::Banner];
        while let Some(kind) = frontier.pop() {
            for next in kind.successors() {
                if !seen.contains(next) {
                    seen.push(*next);
                    frontier.push(*next);
                }
            }
        }
        for kind in BlockKind::ALL {
            assert!(seen.contains(&kind), "{kind} is unreachable");
        }
    }

    #[test]
    fn run_end_is_the_only_terminal() {
        let terminals: Vec<_> = BlockKind::ALL
            .iter()
            .filter(|k| k.is_terminal())
            .collect();
        assert_eq!(terminals, vec![&BlockKind::RunEnd]);
    }
}
