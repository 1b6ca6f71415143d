use serde_json::{json, Value};

use super::labelled;
use crate::marlowe::grammar::statistics::{ElementStats, Histogram, Moments, RunEnd};

/// `{quantity: {moment: value}}`, rows and columns in printed order.
pub(super) fn moments(moments: Moments) -> Value {
    let columns = moments.columns;
    let rows = moments.rows.into_iter().map(|(quantity, values)| {
        let cells = columns
            .iter()
            .copied()
            .zip(values.into_iter().map(Value::from));
        (quantity, labelled(cells))
    });
    json!({ "Moments": labelled(rows) })
}

/// Histograms from successive blocks concatenate when records merge.
pub(super) fn histogram(histogram: Histogram) -> Value {
    json!({
        "Histograms": [{
            "Title": histogram.title,
            "Bins": histogram.bins,
            "Lower": histogram.lower,
            "Width": histogram.width,
            "Counts": histogram.counts,
        }]
    })
}

pub(super) fn element_stats(stats: ElementStats) -> Value {
    let columns = stats.columns;
    let rows: Vec<Value> = stats
        .rows
        .into_iter()
        .map(|(symbol, values)| {
            let cells = std::iter::once(("Symbol", Value::from(symbol))).chain(
                columns
                    .iter()
                    .copied()
                    .zip(values.into_iter().map(Value::from)),
            );
            labelled(cells)
        })
        .collect();
    json!({ "Element Statistics": rows })
}

pub(super) fn run_end(end: RunEnd) -> Value {
    json!({ "Run End": { "Elapsed Time": end.elapsed } })
}
