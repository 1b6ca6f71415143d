//! End-to-end conversion runs over the shared sample report.

use marlowe_log::marlowe::error::ConvertError;
use marlowe_log::marlowe::kinds::BlockKind;
use marlowe_log::marlowe::options::{ParserMode, RunOptions, TableMode, TransitionPolicy};
use marlowe_log::marlowe::pipeline::{Converter, RunReport};
use marlowe_log::marlowe::testing;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const CASCADE_1: &str = "casc0001-001-001";
const CASCADE_2: &str = "casc0002-001-002";

fn run(options: RunOptions, text: &str) -> Result<RunReport, ConvertError> {
    Converter::new(options).convert(text.as_bytes())
}

fn json(path: impl AsRef<Path>) -> Value {
    let text = fs::read_to_string(path.as_ref()).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn csv_rows(path: impl AsRef<Path>) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path.as_ref()).unwrap();
    reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect()
}

/// Every file under `root` with its bytes, keyed by relative path.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let bytes = fs::read(&path).unwrap();
                files.insert(path.strip_prefix(root).unwrap().to_path_buf(), bytes);
            }
        }
    }
    files
}

#[test]
fn both_table_modes_agree_on_every_row() {
    let dir = tempdir().unwrap();
    let report = run(testing::options(dir.path()), testing::SAMPLE_REPORT).unwrap();
    assert_eq!(report.cascades, 2);

    let first = csv_rows(dir.path().join(CASCADE_1).join("lattice_sites.csv"));
    let second = csv_rows(dir.path().join(CASCADE_2).join("lattice_sites.csv"));
    let bundled = csv_rows(dir.path().join("lattice_sites_all.csv"));
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
    let union: Vec<_> = first.iter().chain(second.iter()).cloned().collect();
    assert_eq!(bundled, union);
    assert_eq!(&bundled[0][..3], &["1", "1", "1"]);
    assert_eq!(&bundled[2][..3], &["2", "1", "2"]);
}

#[test]
fn every_table_has_its_fixed_header() {
    let dir = tempdir().unwrap();
    run(testing::options(dir.path()), testing::SAMPLE_REPORT).unwrap();
    let header = |name: &str| -> String {
        let text = fs::read_to_string(dir.path().join(name)).unwrap();
        text.lines().next().unwrap().to_string()
    };
    assert_eq!(
        header("lattice_sites_all.csv"),
        "Cascade,Group,Number,Site,Kind,Symbol,X,Y,Z,State,Interstitial,\
         Interstitial X,Interstitial Y,Interstitial Z,Separation"
    );
    assert_eq!(
        header("distant_pairs_all.csv"),
        "Cascade,Group,Number,Pair,Vacancy Site,Interstitial,Separation,\
         Interstitial X,Interstitial Y,Interstitial Z"
    );
    // cascade 2 printed no detailed description: header only
    let detail = fs::read_to_string(dir.path().join(CASCADE_2).join("detail.csv")).unwrap();
    assert_eq!(detail.lines().count(), 1);
}

#[test]
fn separations_are_resolved_or_placeholders() {
    let dir = tempdir().unwrap();
    run(testing::options(dir.path()), testing::SAMPLE_REPORT).unwrap();
    let rows = csv_rows(dir.path().join("lattice_sites_all.csv"));

    let resolved = &rows[0];
    assert_eq!(&resolved[11..14], &["4.8075", "5.8075", "0.0"]);
    let separation: f64 = resolved[14].parse().unwrap();
    assert!((separation - 5.0).abs() < 1e-9);

    // interstitial index 0
    assert_eq!(&rows[1][10..], &["0", "NA", "NA", "NA", "NA"]);
    // index 3 in a cascade without part 3
    assert_eq!(&rows[2][10..], &["3", "NA", "NA", "NA", "NA"]);

    let document = json(dir.path().join(CASCADE_2).join("cascade.json"));
    assert_eq!(document["Lattice Sites"][0]["Separation"], Value::Null);
}

#[test]
fn cascade_document_layout() {
    let dir = tempdir().unwrap();
    run(testing::options(dir.path()), testing::SAMPLE_REPORT).unwrap();
    let document = json(dir.path().join(CASCADE_1).join("cascade.json"));
    let keys: Vec<&str> = document
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec![
            "Index",
            "Initial",
            "Projectile",
            "Summary",
            "Lattice Sites",
            "Ranges",
            "Sequences",
            "Distant Pairs",
            "Report",
            "Detail",
            "End"
        ]
    );
    assert_eq!(document["Initial"]["Initial Vacant Sites"], 10);
    assert_eq!(document["Summary"]["Energy Lost to Electrons"], 1200.0);
    assert_eq!(document["Detail"][1]["Status"], "Trapped");
    assert_eq!(document["Detail"][1]["Generation"], 1);
    assert_eq!(document["Sequences"][0]["Direction"], serde_json::json!([1, 1, 0]));
}

#[test]
fn run_documents() {
    let dir = tempdir().unwrap();
    run(testing::options(dir.path()), testing::SAMPLE_REPORT).unwrap();

    let initial = json(dir.path().join("initial.json"));
    assert_eq!(initial["Version"], "15b");
    assert_eq!(initial["Control"]["Detailed Reporting"], true);
    assert_eq!(initial["Crystal"]["Structure"], "FCC");
    assert!(initial.get("Moments").is_none());

    let summary = json(dir.path().join("summary.json"));
    assert_eq!(summary["Title"], "5 keV Cu into Cu");
    assert_eq!(summary["Final Summary"]["Cascades Completed"], 2);
    let histograms = summary["Histograms"].as_array().unwrap();
    assert_eq!(histograms.len(), 2);
    assert_eq!(histograms[1]["Title"], "Final Vacant Sites");
    assert_eq!(summary["Moments"]["Projected Range"]["Standard Deviation"], 2.2);
    assert_eq!(summary["Run End"]["Elapsed Time"], 12.5);
}

#[test]
fn ignored_grammar_error_leaves_a_gap() {
    let dir = tempdir().unwrap();
    let mut options = testing::options(dir.path());
    options.parsing.ignore_block_parse_error = true;
    let report = run(options, &testing::broken_report()).unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.blocks, testing::SAMPLE_KINDS.len());

    let document = json(dir.path().join(CASCADE_1).join("cascade.json"));
    assert!(document.get("Summary").is_none());
    assert!(document.get("Lattice Sites").is_some());
    assert!(dir.path().join(CASCADE_2).join("cascade.json").exists());
    assert!(dir.path().join("summary.json").exists());
}

#[test]
fn fatal_grammar_error_keeps_earlier_output() {
    let dir = tempdir().unwrap();
    let text = testing::SAMPLE_REPORT.replacen("Collisions 1300", "Collisions lots", 1);
    let err = run(testing::options(dir.path()), &text).unwrap_err();
    match err {
        ConvertError::Grammar(err) => {
            assert_eq!(err.kind, BlockKind::Summary);
            assert_eq!(err.index.map(|index| index.cascade), Some(2));
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(dir.path().join(CASCADE_1).join("cascade.json").exists());
    assert!(!dir.path().join(CASCADE_2).join("cascade.json").exists());
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempdir().unwrap();
    run(testing::options(dir.path()), testing::SAMPLE_REPORT).unwrap();
    let first = snapshot(dir.path());
    run(testing::options(dir.path()), testing::SAMPLE_REPORT).unwrap();
    let second = snapshot(dir.path());
    assert!(first.len() > 10);
    assert_eq!(first, second);
}

#[test]
fn parser_modes_produce_identical_trees() {
    let pooled = tempdir().unwrap();
    let fresh = tempdir().unwrap();
    run(testing::options(pooled.path()), testing::SAMPLE_REPORT).unwrap();
    let mut options = testing::options(fresh.path());
    options.parsing.parser = ParserMode::Fresh;
    run(options, testing::SAMPLE_REPORT).unwrap();
    assert_eq!(snapshot(pooled.path()), snapshot(fresh.path()));
}

#[test]
fn out_of_order_start_line_under_each_policy() {
    let text = testing::SAMPLE_REPORT.replacen(
        " Report Atoms     2",
        " Run Control\n Report Atoms     2",
        1,
    );

    let lenient = tempdir().unwrap();
    match run(testing::options(lenient.path()), &text) {
        Err(ConvertError::Grammar(err)) => assert_eq!(err.kind, BlockKind::DistantPairs),
        other => panic!("unexpected result {other:?}"),
    }

    let strict = tempdir().unwrap();
    let mut options = testing::options(strict.path());
    options.parsing.transitions = TransitionPolicy::Strict;
    match run(options, &text) {
        Err(ConvertError::UnexpectedBlock { found, state, .. }) => {
            assert_eq!(found, BlockKind::Control);
            assert_eq!(state, Some(BlockKind::DistantPairs));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn raw_dumps_are_numbered_per_scope() {
    let dir = tempdir().unwrap();
    let mut options = testing::options(dir.path());
    options.output.dump_raw_blocks = true;
    options.output.tables = TableMode::None;
    run(options, testing::SAMPLE_REPORT).unwrap();

    assert!(dir.path().join("09.control.txt").exists());
    assert!(dir.path().join("10.final_summary.txt").exists());
    assert!(dir.path().join("15.run_end.txt").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join(CASCADE_1).join("12.cascade_end.txt")).unwrap(),
        "End of Cascade     1\n"
    );
    assert!(dir.path().join(CASCADE_2).join("06.cascade_end.txt").exists());
    assert!(!dir.path().join("lattice_sites_all.csv").exists());
}

#[test]
fn custom_cascade_folder_template() {
    let dir = tempdir().unwrap();
    let mut options = testing::options(dir.path());
    options.output.cascade_dir = "g{group}/c{cascade:03}n{number}".to_string();
    run(options, testing::SAMPLE_REPORT).unwrap();
    assert!(dir.path().join("g1/c002n2/cascade.json").exists());
}

#[test]
fn truncated_input_still_finalizes() {
    let dir = tempdir().unwrap();
    let cut = testing::SAMPLE_REPORT
        .find(" End of Cascade     2")
        .unwrap();
    let report = run(testing::options(dir.path()), &testing::SAMPLE_REPORT[..cut]).unwrap();
    assert_eq!(report.cascades, 2);
    let document = json(dir.path().join(CASCADE_2).join("cascade.json"));
    assert!(document.get("End").is_none());
    let summary = json(dir.path().join("summary.json"));
    assert_eq!(summary["Version"], "15b");
    assert!(summary.get("Final Summary").is_none());
}

#[test]
fn grammar_errors_name_the_raw_input_line() {
    let text = testing::SAMPLE_REPORT.replacen(
        "    Collisions 1234\n",
        "    Collisions 1234\n1MARLOWE 15b      Page    9\n\n\n    Displaced Atoms lots\n",
        1,
    );
    let offset = text.find("    Displaced Atoms lots").unwrap();
    let expected = 1 + text[..offset].matches('\n').count();

    let dir = tempdir().unwrap();
    match run(testing::options(dir.path()), &text) {
        Err(ConvertError::Grammar(err)) => {
            assert_eq!(err.kind, BlockKind::Summary);
            assert_eq!(err.line, expected);
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn invalid_utf8_in_free_text_is_replaced() {
    let text = testing::SAMPLE_REPORT.replacen("Cu into Cu", "Cu in\u{1}o Cu", 1);
    let bytes: Vec<u8> = text
        .into_bytes()
        .into_iter()
        .map(|byte| if byte == 1 { 0xC5 } else { byte })
        .collect();

    let dir = tempdir().unwrap();
    let report = Converter::new(testing::options(dir.path()))
        .convert(bytes.as_slice())
        .unwrap();
    assert_eq!(report.cascades, 2);
    let summary = json(dir.path().join("summary.json"));
    assert_eq!(summary["Title"], "5 keV Cu in\u{FFFD}o Cu");
}
