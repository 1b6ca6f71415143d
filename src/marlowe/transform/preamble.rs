use serde_json::{json, Value};
use tracing::warn;

use super::{labelled, TransformContext};
use crate::marlowe::grammar::preamble::{
    Banner, Beam, Component, ControlEntry, Crystal, Inelastic, Potential, Setting, Surface, Title,
};
use crate::marlowe::terms::elements::atomic_number;

pub(super) fn banner(banner: Banner) -> Value {
    json!({
        "Program": "MARLOWE",
        "Version": banner.version,
        "Run Date": banner.date,
        "Run Time": banner.time,
    })
}

pub(super) fn title(title: Title) -> Value {
    json!({ "Title": title.0 })
}

pub(super) fn crystal(crystal: Crystal) -> Value {
    json!({
        "Crystal": {
            "Structure": crystal.structure,
            "Lattice Constants": crystal.constants,
            "Lattice Angles": crystal.angles,
            "Unit Cell Atoms": crystal.cell_atoms,
        }
    })
}

pub(super) fn components(rows: Vec<Component>, ctx: &TransformContext) -> Value {
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            if atomic_number(row.symbol) != Some(row.z as usize) {
                warn!(
                    line = ctx.line,
                    symbol = row.symbol,
                    z = row.z,
                    "target component atomic number does not match its symbol"
                );
            }
            json!({
                "Kind": row.kind,
                "Symbol": row.symbol,
                "Z": row.z,
                "Mass": row.mass,
                "Binding Energy": row.binding,
                "Cutoff Energy": row.cutoff,
            })
        })
        .collect();
    json!({ "Components": rows })
}

pub(super) fn potentials(rows: Vec<Potential>) -> Value {
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            json!({
                "Pair": [row.pair.0, row.pair.1],
                "Potential": row.name,
                "Screening Length": row.screening_length,
                "Cutoff Radius": row.cutoff_radius,
            })
        })
        .collect();
    json!({ "Potentials": rows })
}

pub(super) fn inelastic(inelastic: Inelastic) -> Value {
    let entries = std::iter::once(("Model", Value::from(inelastic.model))).chain(
        inelastic
            .parameters
            .into_iter()
            .map(|(label, value)| (label, Value::from(value))),
    );
    json!({ "Inelastic": labelled(entries) })
}

pub(super) fn surface(surface: Surface) -> Value {
    json!({
        "Surface": {
            "Type": surface.kind,
            "Surface Normal": surface.normal,
            "Surface Binding Energy": surface.binding,
        }
    })
}

pub(super) fn beam(beam: Beam) -> Value {
    json!({
        "Beam": {
            "Symbol": beam.symbol,
            "Energy": beam.energy,
            "Direction": beam.direction,
        }
    })
}

pub(super) fn control(entries: Vec<ControlEntry>) -> Value {
    let entries = entries.into_iter().map(|entry| {
        let value = match entry.value {
            Setting::Flag(flag) => Value::Bool(flag),
            Setting::Number(number) => Value::from(number),
        };
        (entry.label, value)
    });
    json!({ "Control": labelled(entries) })
}
