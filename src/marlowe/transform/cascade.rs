use serde_json::{json, Value};
use tracing::warn;

use super::{labelled, TransformContext};
use crate::marlowe::grammar::cascade::{CascadeStart, Primary, ReportAtoms, Tally};

pub(super) fn cascade_start(start: CascadeStart) -> Value {
    let initial = start
        .initial
        .into_iter()
        .map(|(label, count)| (format!("Initial {label}"), count));
    json!({
        "Index": {
            "Cascade": start.cascade,
            "Group": start.group,
            "Number": start.number,
        },
        "Initial": labelled(initial),
    })
}

pub(super) fn primary(primary: Primary) -> Value {
    json!({
        "Projectile": {
            "Symbol": primary.symbol,
            "Energy": primary.energy,
            "Start Position": primary.start,
            "Direction": primary.direction,
        }
    })
}

/// A `<label> <number>` list under `key`.
pub(super) fn tallies(key: &str, tallies: Vec<Tally>) -> Value {
    let entries = tallies
        .into_iter()
        .map(|tally| (tally.label, Value::from(tally.value)));
    labelled([(key, labelled(entries))])
}

pub(super) fn report_atoms(report: ReportAtoms) -> Value {
    json!({
        "Report": {
            "Atoms": report.atoms,
            "Moving": report.moving,
            "Stopped": report.stopped,
        }
    })
}

pub(super) fn cascade_end(number: i64, ctx: &TransformContext) -> Value {
    if let Some(index) = ctx.index {
        if i64::from(index.cascade) != number {
            warn!(
                line = ctx.line,
                expected = index.cascade,
                found = number,
                "end marker does not match the active cascade"
            );
        }
    }
    json!({ "End": number })
}
