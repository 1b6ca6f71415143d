use serde_json::{json, Value};

use crate::marlowe::grammar::detail::{Fate, Launch, Origin};

pub(super) fn part1(rows: Vec<Origin>) -> Value {
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            json!({
                "File": row.file,
                "Kind": row.kind,
                "Symbol": row.symbol,
                "Generation": row.generation,
                "Collisions": row.collisions,
                "Initial Energy": row.energy,
            })
        })
        .collect();
    json!({ "Detail Part 1": rows })
}

pub(super) fn part2(rows: Vec<Launch>) -> Value {
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            json!({
                "File": row.file,
                "Initial Position": row.position,
                "Initial Direction": row.direction,
            })
        })
        .collect();
    json!({ "Detail Part 2": rows })
}

pub(super) fn part3(rows: Vec<Fate>) -> Value {
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            json!({
                "File": row.file,
                "Final Position": row.position,
                "Final Energy": row.energy,
                "Status": row.status,
            })
        })
        .collect();
    json!({ "Detail Part 3": rows })
}
