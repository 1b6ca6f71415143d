//! Closed label sets printed by the simulator
//!
//! Sets are listed in report order. Several contain labels that are prefixes of others
//! (`Displaced Atoms` / `Displaced Atoms Sputtered`); matching always goes longest-first.

pub const CRYSTAL_STRUCTURES: &[&str] = &[
    "FCC",
    "BCC",
    "HCP",
    "Diamond",
    "Simple Cubic",
    "Triclinic",
];

pub const POTENTIALS: &[&str] = &[
    "Moliere",
    "Bohr",
    "Thomas-Fermi",
    "Kr-C",
    "Nakagawa-Yamamura",
    "Ziegler-Biersack-Littmark",
    "Ziegler-Biersack-Littmark Universal",
    "Born-Mayer",
];

pub const INELASTIC_MODELS: &[&str] = &[
    "None",
    "Oen-Robinson",
    "Oen-Robinson Local",
    "Lindhard-Scharff",
    "Lindhard-Scharff Nonlocal",
    "Firsov",
];

pub const INELASTIC_PARAMETERS: &[&str] = &[
    "Firsov Coefficient",
    "Local Fraction",
    "Lindhard Coefficient",
    "Lindhard Coefficient Correction",
    "Screening Factor",
];

pub const SURFACE_TYPES: &[&str] = &["Planar", "Rough", "None"];

pub const CONTROL_LABELS: &[&str] = &[
    "Number of Cascades",
    "Number of Groups",
    "Cascades per Group",
    "Random Seed",
    "Detailed Reporting",
    "Lattice Site Report",
    "Range Report",
    "Sequence Report",
    "Maximum Recoil Generations",
    "Minimum Separation",
    "Displacement Threshold",
    "Replacement Threshold",
    "Cutoff Energy",
    "Cutoff Energy for Recoils",
];

pub const INITIAL_LABELS: &[&str] = &["Vacant Sites", "Interstitials", "Substitutions", "Adatoms"];

pub const SUMMARY_LABELS: &[&str] = &[
    "Collisions",
    "Displaced Atoms",
    "Displaced Atoms Sputtered",
    "Replacements",
    "Truncated Trajectories",
    "Energy Lost to Electrons",
    "Energy Lost to Nuclear Recoils",
    "Energy Lost",
    "Final Vacant Sites",
    "Final Interstitials",
    "Final Substitutions",
    "Final Adatoms",
    "Close Pairs",
    "Close Pairs Recombined",
];

pub const SITE_STATES: &[&str] = &["Vacant", "Replaced", "Occupied", "Adatom"];

pub const ATOM_STATUSES: &[&str] = &["Stopped", "Escaped", "Sputtered", "Trapped", "Truncated"];

pub const FINAL_SUMMARY_LABELS: &[&str] = &[
    "Cascades Completed",
    "Cascades Truncated",
    "Total Collisions",
    "Total Displaced Atoms",
    "Total Replacements",
    "Mean Energy Lost to Electrons",
];

pub const MOMENT_NAMES: &[&str] = &[
    "Mean",
    "Variance",
    "Standard Deviation",
    "Skewness",
    "Kurtosis",
    "Excess Kurtosis",
];

/// Quantities that appear in the moments table and as histogram titles.
pub const QUANTITIES: &[&str] = &[
    "Collisions",
    "Displaced Atoms",
    "Displaced Atoms Sputtered",
    "Replacements",
    "Final Vacant Sites",
    "Final Interstitials",
    "Final Substitutions",
    "Final Adatoms",
    "Energy Lost to Electrons",
    "Path Length",
    "Projected Range",
    "Projected Range Straggling",
    "Lateral Spread",
    "Penetration",
    "Frenkel Pair Separation",
    "Replacement Sequence Length",
];

pub const ELEMENT_COLUMNS: &[&str] = &[
    "Displaced",
    "Replaced",
    "Sputtered",
    "Trapped",
    "Escaped",
];
