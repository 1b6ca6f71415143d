//! Run statistics grammars: moments, histograms, per-element statistics and the run end marker.
//!
//! Moments and element statistics are small matrices whose column labels come from a header
//! line; every row must supply exactly one value per column. Histogram counts are a multi-line
//! integer array whose length must match the declared bin count.

use chumsky::prelude::*;

use super::{header, rows, rows1};
use crate::marlowe::terms::labels::{ELEMENT_COLUMNS, MOMENT_NAMES, QUANTITIES};
use crate::marlowe::terms::{
    element, eol, float, int, int_rows, label, number, phrase, Number, Terminal,
};

/// Counts are printed ten to a row.
pub const HISTOGRAM_COLUMNS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Moments {
    pub columns: Vec<&'static str>,
    pub rows: Vec<(&'static str, Vec<Number>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: &'static str,
    pub bins: i64,
    pub lower: f64,
    pub width: f64,
    pub counts: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementStats {
    pub columns: Vec<&'static str>,
    pub rows: Vec<(&'static str, Vec<i64>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunEnd {
    pub elapsed: Option<f64>,
}

fn column_mismatch(row: &str, expected: usize, found: usize) -> String {
    format!("row {row:?} has {found} values for {expected} columns")
}

pub fn moments() -> Terminal<Moments> {
    let columns = phrase("Quantity")
        .ignore_then(label(MOMENT_NAMES).repeated().at_least(1))
        .then_ignore(eol());
    let row = label(QUANTITIES).then(number().repeated().at_least(1)).boxed();
    header("Moments of Distributions")
        .ignore_then(columns)
        .then(rows1(row))
        .try_map(|(columns, rows), span| {
            for (quantity, values) in &rows {
                if values.len() != columns.len() {
                    return Err(Simple::custom(
                        span,
                        column_mismatch(quantity, columns.len(), values.len()),
                    ));
                }
            }
            Ok(Moments { columns, rows })
        })
        .boxed()
}

/// `Histogram: <title>`, `Bins n Lower x Width w`, then the counts.
pub fn histogram() -> Terminal<Histogram> {
    phrase("Histogram:")
        .ignore_then(label(QUANTITIES))
        .then_ignore(eol())
        .then_ignore(phrase("Bins"))
        .then(int(6))
        .then_ignore(phrase("Lower"))
        .then(float())
        .then_ignore(phrase("Width"))
        .then(float())
        .then_ignore(eol())
        .then(int_rows(6, HISTOGRAM_COLUMNS))
        .try_map(|((((title, bins), lower), width), counts), span| {
            if counts.len() as i64 != bins {
                return Err(Simple::custom(
                    span,
                    format!("histogram {title:?} declares {bins} bins but has {} counts", counts.len()),
                ));
            }
            Ok(Histogram {
                title,
                bins,
                lower,
                width,
                counts,
            })
        })
        .boxed()
}

pub fn element_stats() -> Terminal<ElementStats> {
    let columns = phrase("Symbol")
        .ignore_then(label(ELEMENT_COLUMNS).repeated().at_least(1))
        .then_ignore(eol());
    let row = element().then(int(6).repeated().at_least(1)).boxed();
    header("Statistics by Element")
        .ignore_then(columns)
        .then(rows(row))
        .try_map(|(columns, rows), span| {
            for (symbol, values) in &rows {
                if values.len() != columns.len() {
                    return Err(Simple::custom(
                        span,
                        column_mismatch(symbol, columns.len(), values.len()),
                    ));
                }
            }
            Ok(ElementStats { columns, rows })
        })
        .boxed()
}

pub fn run_end() -> Terminal<RunEnd> {
    let elapsed = phrase("Elapsed Time")
        .ignore_then(float())
        .then_ignore(phrase("s"))
        .then_ignore(eol());
    header("End of Run")
        .ignore_then(elapsed.or_not())
        .map(|elapsed| RunEnd { elapsed })
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marlowe::terms::parse_all;

    #[test]
    fn moments_follow_header_columns() {
        let text = "Moments of Distributions\n\
                    Quantity Mean Standard Deviation Excess Kurtosis\n\
                    Projected Range Straggling 4.1 0.9 -0.2\n\
                    Projected Range 12.5 3.2 0.1\n";
        let moments = parse_all(moments(), text).unwrap();
        assert_eq!(
            moments.columns,
            vec!["Mean", "Standard Deviation", "Excess Kurtosis"]
        );
        assert_eq!(moments.rows[0].0, "Projected Range Straggling");
        assert_eq!(moments.rows[1].0, "Projected Range");
        assert_eq!(moments.rows[1].1[2], Number::Float(0.1));
    }

    #[test]
    fn moments_reject_ragged_rows() {
        let text = "Moments of Distributions\n\
                    Quantity Mean Variance\n\
                    Collisions 12.5\n";
        let err = parse_all(moments(), text).unwrap_err();
        assert!(err.iter().any(|e| matches!(
            e.reason(),
            chumsky::error::SimpleReason::Custom(msg) if msg.contains("1 values for 2 columns")
        )));
    }

    #[test]
    fn histogram_counts_span_rows() {
        let text = "Histogram: Projected Range\n\
                    Bins 12 Lower 0.0 Width 2.5\n\
                    0 1 3 5 8 6 4 2 1 1\n\
                    0 1\n";
        let histogram = parse_all(histogram(), text).unwrap();
        assert_eq!(histogram.bins, 12);
        assert_eq!(histogram.counts.len(), 12);
        assert_eq!(histogram.counts[4], 8);
        assert_eq!(histogram.width, 2.5);
    }

    #[test]
    fn histogram_bin_count_must_match() {
        let text = "Histogram: Collisions\nBins 3 Lower 0 Width 1\n1 2\n";
        assert!(parse_all(histogram(), text).is_err());
    }

    #[test]
    fn empty_histograms_have_no_rows() {
        let text = "Histogram: Collisions\nBins 0 Lower 0.0 Width 1.0\n";
        let histogram = parse_all(histogram(), text).unwrap();
        assert_eq!(histogram.bins, 0);
        assert!(histogram.counts.is_empty());

        let missing = "Histogram: Collisions\nBins 2 Lower 0.0 Width 1.0\n";
        assert!(parse_all(super::histogram(), missing).is_err());
    }

    #[test]
    fn element_statistics() {
        let text = "Statistics by Element\n\
                    Symbol Displaced Replaced Sputtered\n\
                    Cu 56 3 1\n\
                    Au 4 0 0\n";
        let stats = parse_all(element_stats(), text).unwrap();
        assert_eq!(stats.columns.len(), 3);
        assert_eq!(stats.rows[1], ("Au", vec![4, 0, 0]));
    }

    #[test]
    fn elapsed_time_is_optional() {
        assert_eq!(
            parse_all(run_end(), "End of Run\n"),
            Ok(RunEnd { elapsed: None })
        );
        assert_eq!(
            parse_all(run_end(), "End of Run\nElapsed Time 12.5 s\n"),
            Ok(RunEnd {
                elapsed: Some(12.5)
            })
        );
    }
}
