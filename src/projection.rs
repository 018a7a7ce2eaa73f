//! Output projection of query results

use std::path::Path;

use crate::error::{Result, SearchError};
use crate::index::table::{
    BITRATE, CODEC, ENCODED_FILE, FILENAME, FPS, GOP, HEIGHT, MEAN_BITRATE, WIDTH,
};
use crate::index::{IndexRow, IndexTable, Value};

/// What to print for each matching row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// The result file path
    #[default]
    Files,
    /// The encoded media file next to the result file
    Media,
    /// One separated line of the main parameters
    Summary,
}

fn text_field(table: &IndexTable, row: &IndexRow, column: &str) -> Result<String> {
    match table.get(row, column) {
        Value::Missing => Err(missing(row, table, column)),
        value => Ok(value.to_string()),
    }
}

fn int_field(table: &IndexTable, row: &IndexRow, column: &str) -> Result<i64> {
    match table.get(row, column) {
        Value::Int(i) => Ok(*i),
        Value::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
        Value::Missing => Err(missing(row, table, column)),
        other => Err(SearchError::Format(format!(
            "column '{}' is not numeric ({:?}) for {}",
            column,
            other.to_string(),
            table.get(row, FILENAME)
        ))),
    }
}

fn missing(row: &IndexRow, table: &IndexTable, column: &str) -> SearchError {
    SearchError::Format(format!(
        "column '{}' is missing for {}",
        column,
        table.get(row, FILENAME)
    ))
}

/// Media path for a row: the encoded file in the result file's directory
pub fn media_path(table: &IndexTable, row: &IndexRow) -> Result<String> {
    let filename = text_field(table, row, FILENAME)?;
    let encoded = text_field(table, row, ENCODED_FILE)?;
    Ok(Path::new(&filename)
        .with_file_name(encoded)
        .to_string_lossy()
        .into_owned())
}

/// Summary line: file, media, codec, gop, fps, width, height, bitrate, mean bitrate
pub fn summary_line(table: &IndexTable, row: &IndexRow, separator: &str) -> Result<String> {
    let mut fields = vec![
        text_field(table, row, FILENAME)?,
        text_field(table, row, ENCODED_FILE)?,
        text_field(table, row, CODEC)?,
    ];
    for column in [GOP, FPS, WIDTH, HEIGHT, BITRATE, MEAN_BITRATE] {
        fields.push(int_field(table, row, column)?.to_string());
    }
    Ok(fields.join(separator))
}

/// Render every row of `table` according to `projection`.
pub fn project(table: &IndexTable, projection: Projection, separator: &str) -> Result<Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| match projection {
            Projection::Files => text_field(table, row, FILENAME),
            Projection::Media => media_path(table, row),
            Projection::Summary => summary_line(table, row, separator),
        })
        .collect()
}
