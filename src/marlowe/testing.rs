//! Testing utilities
//!
//! Shared report fixtures for unit and integration tests.
//!
//! Report text is easy to get subtly wrong (a label with doubled spacing inside it, a histogram row
//! one count short, a header that drifted from its grammar), and a wrong fixture makes a test pass
//! or fail for the wrong reason. Write new tests against the samples here instead of inlining
//! report text, and extend the samples when a test needs something they lack.
//!
//! - [`sample`] gives one well-formed block of every kind, as it appears after normalization. A
//!   sample's body never contains a line that opens any kind, so samples can be concatenated in
//!   any legal order and separated even under the strict transition policy.
//! - [`SAMPLE_REPORT`] is a complete two-cascade run with page headers and blank lines, whose
//!   blocks separate into [`SAMPLE_KINDS`]. Cascade 1 has every optional report; its first
//!   lattice site points at file 2, whose final position is 5.0 away. Cascade 2 has no detailed
//!   description, so its lattice site reference cannot be resolved.

use std::path::Path;

use crate::marlowe::context::CascadeIndex;
use crate::marlowe::kinds::BlockKind;
use crate::marlowe::lines::RawLine;
use crate::marlowe::options::RunOptions;
use crate::marlowe::separator::Block;

pub const BANNER: &str = "Program MARLOWE, Version 15b\n\
Run Date 2019-04-30 Time 13:45:12\n";

pub const TITLE: &str = "Title: 5 keV Cu into Cu\n";

pub const CRYSTAL: &str = "Crystal Structure: FCC\n\
Lattice Constants 3.6150 3.6150 3.6150\n\
Lattice Angles 90.0 90.0 90.0\n\
Unit Cell Atoms 4\n";

pub const COMPONENTS: &str = "Target Components\n\
Kind Symbol Z Mass Binding Cutoff\n\
1 Cu 29 63.546 3.5 5.0\n";

pub const POTENTIALS: &str = "Interatomic Potentials\n\
Pair Potential Screening Length Cutoff Radius\n\
Cu-Cu Moliere 0.0852 2.5500\n";

pub const INELASTIC: &str = "Inelastic Energy Loss: Oen-Robinson\n\
Local Fraction 0.5\n";

pub const SURFACE: &str = "Target Surface: Planar\n\
Surface Normal 0 0 1\n\
Surface Binding Energy 3.5\n";

pub const BEAM: &str = "Primary Particle: Cu\n\
Energy 5000.0 eV\n\
Direction Cosines 0.0 0.0 1.0\n";

pub const CONTROL: &str = "Run Control\n\
Number of Cascades 2\n\
Random Seed 12345\n\
Detailed Reporting Yes\n\
Cutoff Energy 0.5\n";

/// A cascade boundary block exactly as printed, including the indented count row.
pub const CASCADE_START: &str = "Cascade     1:     Group    1     Number    1\n\
Initial Initial Initial Initial\n\
Vacant Sites Interstitials Substitutions Adatoms\n   \
10    20    30    40\n";

pub const PRIMARY: &str = "Primary Recoil: Cu\n\
Energy 5000.0 eV\n\
Start Position 0.0 0.0 -1.0\n\
Direction 0.0 0.0 1.0\n";

pub const SUMMARY: &str = "Cascade Summary\n\
Collisions 1234\n\
Displaced Atoms 56\n\
Replacements 12\n\
Energy Lost to Electrons 1.2D+03\n\
Final Vacant Sites 3\n";

pub const LATTICE_SITES: &str = "Lattice Site Report\n\
Site Kind Symbol X Y Z State Interstitial\n\
1 1 Cu 1.8075 1.8075 0.0 Vacant 2\n\
17 1 Cu 3.6150 0.0 1.8075 Vacant 0\n";

pub const RANGES: &str = "Recoil Ranges\n\
File Symbol Path Length Projected Range Lateral Spread Penetration\n\
1 Cu 45.2 30.1 12.4 28.7\n";

pub const SEQUENCES: &str = "Replacement Sequences\n\
Sequence Length Start Site End Site Direction\n\
1 3 5 17 <1 1 0>\n";

pub const DISTANT_PAIRS: &str = "Distant Frenkel Pairs\n\
Pair Vacancy Site Interstitial Separation\n\
1 1 2 5.0\n";

pub const REPORT_ATOMS: &str = "Report Atoms 2 Moving 0 Stopped 2\n";

pub const DETAIL_PART1: &str = "Detailed Description, Part 1\n\
File Kind Symbol Generation Collisions Initial Energy\n\
1 1 Cu 0 1200 5000.0\n\
2 1 Cu 1 34 27.5\n";

pub const DETAIL_PART2: &str = "Detailed Description, Part 2\n\
File Initial Position Initial Direction\n\
1 0.0 0.0 -1.0 0.0 0.0 1.0\n\
2 1.8075 1.8075 0.0 0.6 0.8 0.0\n";

pub const DETAIL_PART3: &str = "Detailed Description, Part 3\n\
File Final Position Final Energy Status\n\
1 0.0 0.0 12.0 0.0 Stopped\n\
2 4.8075 5.8075 0.0 0.0 Trapped\n";

pub const CASCADE_END: &str = "End of Cascade 1\n";

pub const FINAL_SUMMARY: &str = "Summary of All Cascades\n\
Cascades Completed 2\n\
Total Collisions 2534\n";

pub const MOMENTS: &str = "Moments of Distributions\n\
Quantity Mean Standard Deviation\n\
Collisions 1267.0 33.0\n\
Projected Range 30.1 2.2\n";

pub const HISTOGRAM: &str = "Histogram: Projected Range\n\
Bins 12 Lower 0.0 Width 2.5\n\
0 1 3 5 8 6 4 2 1 1\n\
0 1\n";

pub const ELEMENT_STATS: &str = "Statistics by Element\n\
Symbol Displaced Replaced Sputtered\n\
Cu 56 12 0\n";

pub const RUN_END: &str = "End of Run\n\
Elapsed Time 12.5 s\n";

/// One well-formed block of `kind`.
pub fn sample(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Banner => BANNER,
        BlockKind::Title => TITLE,
        BlockKind::Crystal => CRYSTAL,
        BlockKind::Components => COMPONENTS,
        BlockKind::Potentials => POTENTIALS,
        BlockKind::Inelastic => INELASTIC,
        BlockKind::Surface => SURFACE,
        BlockKind::Beam => BEAM,
        BlockKind::Control => CONTROL,
        BlockKind::CascadeStart => CASCADE_START,
        BlockKind::Primary => PRIMARY,
        BlockKind::Summary => SUMMARY,
        BlockKind::LatticeSites => LATTICE_SITES,
        BlockKind::Ranges => RANGES,
        BlockKind::Sequences => SEQUENCES,
        BlockKind::DistantPairs => DISTANT_PAIRS,
        BlockKind::ReportAtoms => REPORT_ATOMS,
        BlockKind::DetailPart1 => DETAIL_PART1,
        BlockKind::DetailPart2 => DETAIL_PART2,
        BlockKind::DetailPart3 => DETAIL_PART3,
        BlockKind::CascadeEnd => CASCADE_END,
        BlockKind::FinalSummary => FINAL_SUMMARY,
        BlockKind::Moments => MOMENTS,
        BlockKind::Histogram => HISTOGRAM,
        BlockKind::ElementStats => ELEMENT_STATS,
        BlockKind::RunEnd => RUN_END,
    }
}

/// Every kind with its sample, in report order.
pub fn block_samples() -> Vec<(BlockKind, &'static str)> {
    BlockKind::ALL
        .iter()
        .map(|kind| (*kind, sample(*kind)))
        .collect()
}

/// A separated block built from report text, lines numbered from `first_line`.
///
/// Lines are stripped and blank lines dropped, as the normalizer would.
pub fn block(
    kind: BlockKind,
    index: Option<CascadeIndex>,
    first_line: usize,
    text: &str,
) -> Block {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(n, line)| RawLine::new(first_line + n, line));
    let head = lines
        .next()
        .unwrap_or_else(|| RawLine::new(first_line, ""));
    Block {
        kind,
        index,
        head,
        body: lines.collect(),
    }
}

/// A complete run of two cascades.
pub const SAMPLE_REPORT: &str = "\
1MARLOWE 15b      Page    1
 Program MARLOWE, Version 15b
 Run Date 2019-04-30 Time 13:45:12

 Title: 5 keV Cu into Cu

 Crystal Structure: FCC
    Lattice Constants   3.6150   3.6150   3.6150
    Lattice Angles     90.0     90.0     90.0
    Unit Cell Atoms      4

 Target Components
    Kind Symbol   Z      Mass   Binding   Cutoff
       1   Cu    29    63.546       3.5      5.0

 Interatomic Potentials
    Pair   Potential   Screening Length   Cutoff Radius
    Cu-Cu  Moliere            0.0852          2.5500

 Inelastic Energy Loss: Oen-Robinson
    Local Fraction   0.5

 Target Surface: Planar
    Surface Normal   0  0  1
    Surface Binding Energy   3.5

 Primary Particle: Cu
    Energy   5000.0 eV
    Direction Cosines   0.0   0.0   1.0

 Run Control
    Number of Cascades        2
    Random Seed           12345
    Detailed Reporting      Yes
    Cutoff Energy           0.5
1MARLOWE 15b      Page    2
 Cascade     1:     Group    1     Number    1
    Initial Initial Initial Initial
    Vacant Sites Interstitials Substitutions Adatoms
       10    20    30    40

 Primary Recoil: Cu
    Energy   5000.0 eV
    Start Position   0.0   0.0  -1.0
    Direction        0.0   0.0   1.0

 Cascade Summary
    Collisions 1234
    Displaced Atoms 56
    Replacements 12
    Energy Lost to Electrons 1.2D+03
    Final Vacant Sites 3

 Lattice Site Report
    Site Kind Symbol      X         Y         Z     State   Interstitial
       1    1   Cu    1.8075    1.8075    0.0000   Vacant        2
      17    1   Cu    3.6150    0.0000    1.8075   Vacant        0

 Recoil Ranges
    File Symbol  Path Length  Projected Range  Lateral Spread  Penetration
       1   Cu        45.2          30.1            12.4           28.7

 Replacement Sequences
    Sequence Length Start Site End Site Direction
         1      3        5       17    < 1 1 0>

 Distant Frenkel Pairs
    Pair Vacancy Site Interstitial Separation
       1        1          2         5.0

 Report Atoms     2 Moving     0 Stopped     2
1MARLOWE 15b      Page    3
 Detailed Description, Part 1
    File Kind Symbol Generation Collisions Initial Energy
       1    1   Cu     0        1200      5000.0
       2    1   Cu     1          34        27.5

 Detailed Description, Part 2
    File Initial Position Initial Direction
       1   0.0     0.0    -1.0      0.0   0.0   1.0
       2   1.8075  1.8075  0.0      0.6   0.8   0.0

 Detailed Description, Part 3
    File Final Position Final Energy Status
       1   0.0     0.0    12.0     0.0   Stopped
       2   4.8075  5.8075  0.0     0.0   Trapped

 End of Cascade     1
1MARLOWE 15b      Page    4
 Cascade     2:     Group    1     Number    2
    Initial Initial Initial Initial
    Vacant Sites Interstitials Substitutions Adatoms
       10    20    30    40

 Primary Recoil: Cu
    Energy   5000.0 eV
    Start Position   1.0   1.0  -1.0
    Direction        0.0   0.0   1.0

 Cascade Summary
    Collisions 1300
    Displaced Atoms 61
    Replacements 9
    Energy Lost to Electrons 1.3D+03
    Final Vacant Sites 1

 Lattice Site Report
    Site Kind Symbol      X         Y         Z     State   Interstitial
       5    1   Cu    0.0000    1.8075    1.8075   Vacant        3

 Report Atoms     1 Moving     0 Stopped     1

 End of Cascade     2
1MARLOWE 15b      Page    5
 Summary of All Cascades
    Cascades Completed 2
    Total Collisions 2534

 Moments of Distributions
    Quantity Mean Standard Deviation
    Collisions 1267.0 33.0
    Projected Range 30.1 2.2

 Histogram: Projected Range
    Bins 12 Lower 0.0 Width 2.5
       0     1     3     5     8     6     4     2     1     1
       0     1

 Histogram: Final Vacant Sites
    Bins 4 Lower 0.0 Width 1.0
       0     1     0     1

 Statistics by Element
    Symbol Displaced Replaced Sputtered
    Cu 117 21 0

 End of Run
    Elapsed Time 12.5 s
";

/// Kinds of the blocks in [`SAMPLE_REPORT`], in order.
pub const SAMPLE_KINDS: [BlockKind; 33] = [
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
    BlockKind::CascadeStart,
    BlockKind::Primary,
    BlockKind::Summary,
    BlockKind::LatticeSites,
    BlockKind::ReportAtoms,
    BlockKind::CascadeEnd,
    BlockKind::FinalSummary,
    BlockKind::Moments,
    BlockKind::Histogram,
    BlockKind::Histogram,
    BlockKind::ElementStats,
    BlockKind::RunEnd,
];

/// [`SAMPLE_REPORT`] with the first cascade summary broken.
pub fn broken_report() -> String {
    SAMPLE_REPORT.replacen("Collisions 1234", "Collisions lots", 1)
}

/// Default options writing under `root`.
pub fn options(root: &Path) -> RunOptions {
    let mut options = RunOptions::default();
    options.output.root = root.to_path_buf();
    options
}
