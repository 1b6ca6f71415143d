//! # marlowe-log
//!
//! Converts the printed report log of the MARLOWE collision-cascade simulator into
//! structured records: a JSON document per run and per cascade, plus per-cascade and
//! bundled CSV tables.
//!
//! The work is split the way the report is read:
//!
//! ```text
//! raw text -> lines (normalizer) -> separator (block kinds) -> grammar (parse tree)
//!          -> transform (record) -> context (cross-references) -> output (json, csv)
//! ```
//!
//! Most callers only need [`marlowe::pipeline::Converter`].

pub mod marlowe;
