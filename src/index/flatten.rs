//! Test configuration flattening
//!
//! Turns the nested `test` section of a result record into ordered
//! `group.key` columns. Only the known groups are kept, and a
//! `resolution` of the form `WxH` becomes `group.width` and `group.height`.

use crate::error::{Result, SearchError};
use crate::index::table::Value;

/// Configuration groups copied into the index
pub const FLATTENED_GROUPS: [&str; 3] = ["common", "input", "configure"];

/// Flattened `(column, value)` pairs in declaration order
pub type Flattened = Vec<(String, Value)>;

/// Parse a `WxH` resolution string.
pub fn parse_resolution(s: &str) -> Option<(i64, i64)> {
    let (w, h) = s.split_once('x')?;
    let w = w.trim().parse().ok()?;
    let h = h.trim().parse().ok()?;
    Some((w, h))
}

/// Flatten the known groups of a test section.
pub fn flatten_test(test: &serde_json::Map<String, serde_json::Value>) -> Result<Flattened> {
    let mut out = Vec::new();
    for (group, fields) in test {
        if !FLATTENED_GROUPS.contains(&group.as_str()) {
            continue;
        }
        let Some(fields) = fields.as_object() else {
            return Err(SearchError::parse(
                fields.to_string(),
                format!("group '{group}' is not an object"),
            ));
        };
        for (key, value) in fields {
            if key == "resolution" {
                let (width, height) = value
                    .as_str()
                    .and_then(parse_resolution)
                    .ok_or_else(|| {
                        SearchError::parse(value.to_string(), format!("bad {group}.resolution"))
                    })?;
                out.push((format!("{group}.width"), Value::Int(width)));
                out.push((format!("{group}.height"), Value::Int(height)));
                continue;
            }
            out.push((format!("{group}.{key}"), Value::from_json(value)));
        }
    }
    Ok(out)
}
