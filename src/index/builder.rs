//! Index builder - scans a search root and writes the index file

use std::path::{Path, PathBuf};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::index::flatten::flatten_test;
use crate::index::record::{DeviceDescriptor, ResultRecord};
use crate::index::scanner::scan_dir;
use crate::index::table::{IndexRow, IndexTable, Value, LEADING_COLUMNS, MEAN_BITRATE};

/// Outcome of an index build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Where the index was written
    pub index_path: PathBuf,
    /// Number of rows written
    pub rows: usize,
    /// Result files that were skipped, with the reason
    pub failures: Vec<(PathBuf, SearchError)>,
}

/// A result file turned into row values, before header alignment
struct BuiltRow {
    path: PathBuf,
    keys: Vec<String>,
    values: Vec<Value>,
}

// Empty strings are stored as missing cells.
fn text(s: String) -> Value {
    if s.is_empty() {
        Value::Missing
    } else {
        Value::Str(s)
    }
}

fn build_row(path: &Path, config: &SearchConfig) -> Result<BuiltRow> {
    let device = DeviceDescriptor::for_result(path, &config.device_file_name);
    let record = ResultRecord::from_file(path)?;
    let flat = flatten_test(&record.test).map_err(|e| SearchError::record_read(path, e))?;

    let (keys, config_values): (Vec<String>, Vec<Value>) = flat.into_iter().unzip();
    let mut values = Vec::with_capacity(config_values.len() + LEADING_COLUMNS.len() + 1);
    values.push(text(device.model));
    values.push(text(device.platform));
    values.push(text(device.serial));
    values.push(Value::Str(path.to_string_lossy().into_owned()));
    values.push(text(record.encodedfile));
    values.extend(config_values);
    values.push(Value::from_json(&record.meanbitrate));

    Ok(BuiltRow {
        path: record.path,
        keys,
        values,
    })
}

/// Build the in-memory table for a search root without writing it.
pub fn build_table(root: &Path, config: &SearchConfig, recursive: bool) -> (IndexTable, BuildReport) {
    let files = scan_dir(root, recursive);

    let mut report = BuildReport::default();
    let mut built = Vec::new();
    for file in files {
        match build_row(&file, config) {
            Ok(row) => built.push(row),
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", file, e);
                report.failures.push((file, e));
            }
        }
    }

    // The header follows the last record that parsed.
    let keys = built.last().map(|r| r.keys.clone()).unwrap_or_default();
    let mut columns: Vec<String> = LEADING_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(keys.iter().cloned());
    columns.push(MEAN_BITRATE.to_string());

    let mut table = IndexTable::new(columns);
    for mut row in built {
        if row.keys != keys {
            tracing::warn!(
                "{:?} has a different configuration layout than the index header ({} vs {} keys); values are kept by position",
                row.path,
                row.keys.len(),
                keys.len()
            );
        }
        row.values.resize(table.columns.len(), Value::Missing);
        table.rows.push(IndexRow { values: row.values });
    }
    report.rows = table.len();
    (table, report)
}

/// Build the index for `root` and write it, replacing any previous index.
pub fn build_index(root: &Path, config: &SearchConfig, recursive: bool) -> Result<BuildReport> {
    tracing::info!("Indexing {:?} (recursive={})", root, recursive);
    let (table, mut report) = build_table(root, config, recursive);

    report.index_path = config.index_path(root);
    table.write_to(&report.index_path)?;

    tracing::info!(
        "Wrote {:?}: {} rows, {} files skipped",
        report.index_path,
        report.rows,
        report.failures.len()
    );
    Ok(report)
}
