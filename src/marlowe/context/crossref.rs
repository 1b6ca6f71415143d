//! Cross-references between independently parsed cascade blocks.
//!
//! The detailed description is printed in three parts keyed by file index; the lattice site and
//! distant pair reports point at atoms by the same index. Resolution happens once per cascade,
//! after every block has been parsed.

use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::marlowe::context::CascadeIndex;
use crate::marlowe::record::{vector3, Record};

pub const DETAIL_PARTS: [&str; 3] = ["Detail Part 1", "Detail Part 2", "Detail Part 3"];

/// Final positions by file index, or `None` when part 3 was not printed.
pub fn final_positions(record: &Record) -> Option<HashMap<i64, [f64; 3]>> {
    let rows = record.get(DETAIL_PARTS[2])?.as_array()?;
    let positions = rows
        .iter()
        .filter_map(|row| {
            let file = row.get("File")?.as_i64()?;
            let position = vector3(row.get("Final Position")?)?;
            Some((file, position))
        })
        .collect();
    Some(positions)
}

pub fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Merge the detail parts into one row per file: part 1 order first, then files seen only later.
///
/// Returns `None` when no part is present.
pub fn merge_details(record: &Record) -> Option<Vec<Value>> {
    let mut present = false;
    let mut order: Vec<Map<String, Value>> = Vec::new();
    let mut slots: HashMap<i64, usize> = HashMap::new();
    for part in DETAIL_PARTS {
        let Some(rows) = record.get(part).and_then(Value::as_array) else {
            continue;
        };
        present = true;
        for row in rows {
            let (Some(file), Some(fields)) = (
                row.get("File").and_then(Value::as_i64),
                row.as_object(),
            ) else {
                continue;
            };
            let slot = *slots.entry(file).or_insert_with(|| {
                let mut merged = Map::new();
                merged.insert("File".to_string(), Value::from(file));
                order.push(merged);
                order.len() - 1
            });
            for (key, value) in fields {
                if key != "File" {
                    order[slot].insert(key.clone(), value.clone());
                }
            }
        }
    }
    present.then(|| order.into_iter().map(Value::Object).collect())
}

/// Add `Interstitial Position` and `Separation` to every lattice site row, and
/// `Interstitial Position` to every distant pair row.
pub fn attach_interstitials(record: &mut Record, index: CascadeIndex) {
    let finals = final_positions(record);
    if let Some(Value::Array(rows)) = record.get_mut("Lattice Sites") {
        for row in rows.iter_mut() {
            let Value::Object(site) = row else { continue };
            let located = locate(site, finals.as_ref(), index, "lattice site");
            let separation = match (located, site.get("Position").and_then(vector3)) {
                (Some(atom), Some(position)) => Value::from(distance(position, atom)),
                _ => Value::Null,
            };
            site.insert("Interstitial Position".to_string(), position_value(located));
            site.insert("Separation".to_string(), separation);
        }
    }
    if let Some(Value::Array(rows)) = record.get_mut("Distant Pairs") {
        for row in rows.iter_mut() {
            let Value::Object(pair) = row else { continue };
            let located = locate(pair, finals.as_ref(), index, "distant pair");
            pair.insert("Interstitial Position".to_string(), position_value(located));
        }
    }
}

fn locate(
    row: &Map<String, Value>,
    finals: Option<&HashMap<i64, [f64; 3]>>,
    index: CascadeIndex,
    source: &str,
) -> Option<[f64; 3]> {
    let file = row.get("Interstitial").and_then(Value::as_i64)?;
    if file == 0 {
        return None;
    }
    let finals = finals?;
    let found = finals.get(&file).copied();
    if found.is_none() {
        debug!(%index, file, source, "interstitial index has no final position");
    }
    found
}

fn position_value(position: Option<[f64; 3]>) -> Value {
    match position {
        Some(position) => Value::from(position.to_vec()),
        None => Value::Null,
    }
}
