//! Flat tabular index
//!
//! The index is a schema-on-read table: an ordered list of column names
//! discovered while building, and rows of tagged scalar values aligned
//! positionally with those columns. It is persisted as a CSV file.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{IndexLoadError, Result};

pub const MODEL: &str = "model";
pub const PLATFORM: &str = "platform";
pub const SERIAL: &str = "serial";
pub const FILENAME: &str = "filename";
pub const ENCODED_FILE: &str = "encodedfile";
pub const MEAN_BITRATE: &str = "meanbitrate";

pub const CODEC: &str = "configure.codec";
pub const BITRATE: &str = "configure.bitrate";
pub const GOP: &str = "configure.iFrameInterval";
pub const FPS: &str = "configure.framerate";
pub const WIDTH: &str = "configure.width";
pub const HEIGHT: &str = "configure.height";

/// Columns every index starts with, before the flattened configuration keys
pub const LEADING_COLUMNS: [&str; 5] = [MODEL, PLATFORM, SERIAL, FILENAME, ENCODED_FILE];

/// Columns read back as text regardless of how the cell looks
pub const TEXT_COLUMNS: [&str; 6] = [MODEL, PLATFORM, SERIAL, FILENAME, ENCODED_FILE, CODEC];

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Infer a cell type from its textual form.
    pub fn infer(s: &str) -> Self {
        if s.is_empty() {
            return Value::Missing;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Int(i);
        }
        // Rust also parses "inf" and "nan"; keep those as strings.
        if s.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(f) = s.parse::<f64>() {
                return Value::Float(f);
            }
        }
        Value::Str(s.to_string())
    }

    /// Text cell that never becomes a number; empty is missing.
    pub fn text(s: &str) -> Self {
        if s.is_empty() {
            Value::Missing
        } else {
            Value::Str(s.to_string())
        }
    }

    pub fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::Bool(b) => Value::Str(b.to_string()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Missing),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            other => Value::Str(other.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Integer view; integral floats count as integers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    /// Total order used for sorting: numbers, then strings, then missing.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Int(_) | Value::Float(_) => 0,
                Value::Str(_) => 1,
                Value::Missing => 2,
            }
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => rank(self).cmp(&rank(other)),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" so the cell reads back as a float.
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Str(s) => f.write_str(s),
        }
    }
}

/// One row of the index, aligned with `IndexTable::columns`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRow {
    pub values: Vec<Value>,
}

/// The whole index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexTable {
    pub columns: Vec<String>,
    pub rows: Vec<IndexRow>,
}

impl IndexTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of `column` in `row`; absent columns read as missing.
    pub fn get<'a>(&self, row: &'a IndexRow, column: &str) -> &'a Value {
        static MISSING: Value = Value::Missing;
        self.column_index(column)
            .and_then(|i| row.values.get(i))
            .unwrap_or(&MISSING)
    }

    /// Rows whose stored result path contains `name`
    pub fn find_by_filename(&self, name: &str) -> Vec<&IndexRow> {
        let Some(idx) = self.column_index(FILENAME) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter(|r| {
                r.values
                    .get(idx)
                    .and_then(Value::as_str)
                    .is_some_and(|f| f.contains(name))
            })
            .collect()
    }

    /// Write the table as CSV, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.values.iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a table written by `write_to`.
    pub fn read_from(path: &Path) -> std::result::Result<Self, IndexLoadError> {
        let malformed = |reason: String| IndexLoadError::Malformed {
            path: path.to_path_buf(),
            reason,
        };

        let mut reader = match csv::Reader::from_path(path) {
            Ok(r) => r,
            Err(e) => return Err(classify_open_error(path, e)),
        };

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| malformed(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();
        if columns.iter().all(|c| c.is_empty()) {
            return Err(malformed("no header row".to_string()));
        }
        if !columns.iter().any(|c| c == FILENAME) {
            return Err(malformed(format!("missing '{}' column", FILENAME)));
        }

        let text: Vec<bool> = columns
            .iter()
            .map(|c| TEXT_COLUMNS.contains(&c.as_str()))
            .collect();

        let mut table = IndexTable::new(columns);
        for record in reader.records() {
            let record = record.map_err(|e| malformed(e.to_string()))?;
            let values = record
                .iter()
                .enumerate()
                .map(|(i, cell)| match text.get(i) {
                    Some(true) => Value::text(cell),
                    _ => Value::infer(cell),
                })
                .collect();
            table.rows.push(IndexRow { values });
        }
        Ok(table)
    }
}

fn classify_open_error(path: &Path, err: csv::Error) -> IndexLoadError {
    match err.kind() {
        csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            IndexLoadError::Missing(PathBuf::from(path))
        }
        _ => IndexLoadError::Malformed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
    }
}
