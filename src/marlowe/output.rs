//! Output Writer
//!
//! Layout under the output root:
//!
//!     initial.json                 preamble records
//!     summary.json                 preamble and run statistics
//!     <table>_all.csv              bundled tables, one row set per cascade
//!     <cascade-dir>/cascade.json   finalized cascade document
//!     <cascade-dir>/<table>.csv    per-cascade tables
//!     <cascade-dir>/NN.<kind>.txt  raw block dumps (run-scoped dumps go to the root)
//!
//! Bundled tables are created, truncating, when the writer is created and stay open for the run,
//! so a rerun over the same input reproduces them byte for byte. Cascade folders are created on
//! first use.

pub mod template;

use csv::Writer;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::marlowe::context::CascadeIndex;
use crate::marlowe::error::{ConvertError, Result};
use crate::marlowe::kinds::BlockKind;
use crate::marlowe::options::{OutputOptions, TableMode};
use crate::marlowe::record::Record;
use crate::marlowe::tables::TableKind;
use template::{Arg, Template};

pub const INITIAL_FILE: &str = "initial.json";
pub const SUMMARY_FILE: &str = "summary.json";
pub const CASCADE_FILE: &str = "cascade.json";

const CASCADE_DIR_FIELDS: &[&str] = &["cascade", "group", "number"];
const BLOCK_DUMP_FIELDS: &[&str] = &["seq", "block", "cascade", "group", "number"];

struct BundledTable {
    kind: TableKind,
    path: PathBuf,
    writer: Writer<File>,
}

pub struct OutputWriter {
    root: PathBuf,
    cascade_dir: Template,
    block_dump: Template,
    dump_raw_blocks: bool,
    tables: TableMode,
    bundled: Vec<BundledTable>,
}

impl OutputWriter {
    /// Validate templates, create the root and open the bundled tables.
    pub fn create(options: &OutputOptions) -> Result<Self> {
        let cascade_dir = Template::parse(&options.cascade_dir, CASCADE_DIR_FIELDS)?;
        let block_dump = Template::parse(&options.block_dump, BLOCK_DUMP_FIELDS)?;
        let root = options.root.clone();
        fs::create_dir_all(&root).map_err(|err| ConvertError::write(&root, err))?;

        let mut bundled = Vec::new();
        if options.tables.bundled() {
            for kind in TableKind::ALL {
                let path = root.join(kind.bundled_file_name());
                let mut writer = open_table(&path)?;
                writer
                    .write_record(kind.header())
                    .map_err(|source| table_error(&path, source))?;
                bundled.push(BundledTable { kind, path, writer });
            }
        }
        Ok(OutputWriter {
            root,
            cascade_dir,
            block_dump,
            dump_raw_blocks: options.dump_raw_blocks,
            tables: options.tables,
            bundled,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dumps_enabled(&self) -> bool {
        self.dump_raw_blocks
    }

    /// Folder of one cascade.
    pub fn cascade_dir(&self, index: CascadeIndex) -> PathBuf {
        let name = self.cascade_dir.render(|field| index_arg(index, field));
        self.root.join(name)
    }

    pub fn write_initial(&mut self, record: &Record) -> Result<()> {
        write_json(&self.root.join(INITIAL_FILE), record)
    }

    pub fn write_summary(&mut self, record: &Record) -> Result<()> {
        write_json(&self.root.join(SUMMARY_FILE), record)
    }

    /// Write a finalized cascade document and its table rows.
    pub fn write_cascade(&mut self, index: CascadeIndex, document: &Record) -> Result<()> {
        let dir = self.cascade_dir(index);
        fs::create_dir_all(&dir).map_err(|err| ConvertError::write(&dir, err))?;
        write_json(&dir.join(CASCADE_FILE), document)?;

        if self.tables.per_cascade() {
            for kind in TableKind::ALL {
                let path = dir.join(kind.file_name());
                let mut writer = open_table(&path)?;
                writer
                    .write_record(kind.header())
                    .map_err(|source| table_error(&path, source))?;
                for row in kind.rows(index, document) {
                    writer
                        .write_record(&row)
                        .map_err(|source| table_error(&path, source))?;
                }
                writer.flush().map_err(|err| ConvertError::write(&path, err))?;
            }
        }
        for table in &mut self.bundled {
            for row in table.kind.rows(index, document) {
                table
                    .writer
                    .write_record(&row)
                    .map_err(|source| table_error(&table.path, source))?;
            }
        }
        debug!(%index, dir = %dir.display(), "cascade output written");
        Ok(())
    }

    /// Write a block's raw text, into its cascade folder or the root.
    pub fn dump_block(
        &mut self,
        index: Option<CascadeIndex>,
        seq: usize,
        kind: BlockKind,
        text: &str,
    ) -> Result<()> {
        let dir = match index {
            Some(index) => self.cascade_dir(index),
            None => self.root.clone(),
        };
        fs::create_dir_all(&dir).map_err(|err| ConvertError::write(&dir, err))?;
        let name = self.block_dump.render(|field| match field {
            "seq" => Some(Arg::Int(seq as u64)),
            "block" => Some(Arg::Text(kind.name())),
            other => index.and_then(|index| index_arg(index, other)),
        });
        let path = dir.join(name);
        fs::write(&path, text).map_err(|err| ConvertError::write(&path, err))
    }

    /// Flush and close the bundled tables.
    pub fn finish(self) -> Result<()> {
        for mut table in self.bundled {
            table
                .writer
                .flush()
                .map_err(|err| ConvertError::write(&table.path, err))?;
        }
        Ok(())
    }
}

fn index_arg(index: CascadeIndex, field: &str) -> Option<Arg<'static>> {
    let value = match field {
        "cascade" => index.cascade,
        "group" => index.group,
        "number" => index.number,
        _ => return None,
    };
    Some(Arg::Int(u64::from(value)))
}

fn open_table(path: &Path) -> Result<Writer<File>> {
    Writer::from_path(path).map_err(|source| table_error(path, source))
}

fn table_error(path: &Path, source: csv::Error) -> ConvertError {
    ConvertError::Table {
        path: path.to_path_buf(),
        source,
    }
}

fn write_json(path: &Path, record: &Record) -> Result<()> {
    let mut text = serde_json::to_string_pretty(record).map_err(|source| ConvertError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');
    fs::write(path, text).map_err(|err| ConvertError::write(path, err))
}
