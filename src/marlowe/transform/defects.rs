use serde_json::{json, Value};

use crate::marlowe::grammar::defects::{DistantPair, LatticeSite, RecoilRange, Sequence};

pub(super) fn lattice_sites(rows: Vec<LatticeSite>) -> Value {
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            json!({
                "Site": row.site,
                "Kind": row.kind,
                "Symbol": row.symbol,
                "Position": row.position,
                "State": row.state,
                "Interstitial": row.interstitial,
            })
        })
        .collect();
    json!({ "Lattice Sites": rows })
}

pub(super) fn ranges(rows: Vec<RecoilRange>) -> Value {
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            json!({
                "File": row.file,
                "Symbol": row.symbol,
                "Path Length": row.path_length,
                "Projected Range": row.projected,
                "Lateral Spread": row.lateral,
                "Penetration": row.penetration,
            })
        })
        .collect();
    json!({ "Ranges": rows })
}

pub(super) fn sequences(rows: Vec<Sequence>) -> Value {
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            json!({
                "Sequence": row.sequence,
                "Length": row.length,
                "Start Site": row.start_site,
                "End Site": row.end_site,
                "Direction": row.direction,
            })
        })
        .collect();
    json!({ "Sequences": rows })
}

pub(super) fn distant_pairs(rows: Vec<DistantPair>) -> Value {
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            json!({
                "Pair": row.pair,
                "Vacancy Site": row.vacancy_site,
                "Interstitial": row.interstitial,
                "Separation": row.separation,
            })
        })
        .collect();
    json!({ "Distant Pairs": rows })
}
