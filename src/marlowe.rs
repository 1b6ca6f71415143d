//! Main module for MARLOWE report conversion

pub mod context;
pub mod error;
pub mod grammar;
pub mod kinds;
pub mod lines;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod separator;
pub mod tables;
pub mod terms;
pub mod testing;
pub mod transform;
