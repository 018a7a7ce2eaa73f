//! Row filtering and ordering
//!
//! Every filter is optional and filters combine with AND. Rows are sorted
//! by model, codec, gop, frame rate, height and bitrate afterwards.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{Result, SearchError};
use crate::index::table::{BITRATE, CODEC, FPS, GOP, HEIGHT, MODEL, WIDTH};
use crate::index::{IndexRow, IndexTable, Value};
use crate::query::parse_bitrate;

/// Sort order applied to query results
pub const SORT_COLUMNS: [&str; 6] = [MODEL, CODEC, GOP, FPS, HEIGHT, BITRATE];

/// Bitrate constraint: `300k` or `200000-1M`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitrateFilter {
    Exact(u64),
    /// Inclusive on both ends
    Range(u64, u64),
}

impl FromStr for BitrateFilter {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [value] => Ok(BitrateFilter::Exact(parse_bitrate(value)?)),
            [low, high] => {
                let (low, high) = (parse_bitrate(low)?, parse_bitrate(high)?);
                Ok(BitrateFilter::Range(low.min(high), low.max(high)))
            }
            _ => Err(SearchError::parse(s, "expected BITRATE or LOW-HIGH")),
        }
    }
}

impl BitrateFilter {
    pub fn matches(&self, bitrate: u64) -> bool {
        match *self {
            BitrateFilter::Exact(v) => bitrate == v,
            BitrateFilter::Range(low, high) => (low..=high).contains(&bitrate),
        }
    }
}

/// Size constraint: `1280x720`, or `720` to match either dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeFilter {
    Exact { width: i64, height: i64 },
    /// Matches when the width or the height equals the value.
    /// Searching by a single dimension is intentionally loose.
    Either(i64),
}

impl FromStr for SizeFilter {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        let dim = |t: &str| {
            t.trim()
                .parse::<i64>()
                .map_err(|e| SearchError::parse(s, format!("bad dimension '{t}': {e}")))
        };
        let parts: Vec<&str> = s.split('x').collect();
        match parts.as_slice() {
            [value] => Ok(SizeFilter::Either(dim(*value)?)),
            [width, height] => Ok(SizeFilter::Exact {
                width: dim(*width)?,
                height: dim(*height)?,
            }),
            _ => Err(SearchError::parse(s, "expected WIDTHxHEIGHT or a single dimension")),
        }
    }
}

impl SizeFilter {
    pub fn matches(&self, width: Option<i64>, height: Option<i64>) -> bool {
        match *self {
            SizeFilter::Exact { width: w, height: h } => width == Some(w) && height == Some(h),
            SizeFilter::Either(v) => width == Some(v) || height == Some(v),
        }
    }
}

/// Parsed query filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Case-sensitive substring of the codec name
    pub codec: Option<String>,
    pub bitrate: Option<BitrateFilter>,
    pub gop: Option<i64>,
    /// Compared exactly, without tolerance
    pub fps: Option<f64>,
    pub size: Option<SizeFilter>,
}

impl FilterSpec {
    /// Build a spec from raw command line tokens.
    pub fn from_tokens(
        codec: Option<&str>,
        bitrate: Option<&str>,
        gop: Option<i64>,
        fps: Option<f64>,
        size: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            codec: codec.map(str::to_string),
            bitrate: bitrate.map(str::parse).transpose()?,
            gop,
            fps,
            size: size.map(str::parse).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterSpec::default()
    }

    fn matches(&self, table: &IndexTable, row: &IndexRow) -> bool {
        if let Some(codec) = &self.codec {
            let hit = table
                .get(row, CODEC)
                .as_str()
                .is_some_and(|c| c.contains(codec.as_str()));
            if !hit {
                return false;
            }
        }
        if let Some(bitrate) = &self.bitrate {
            let hit = table
                .get(row, BITRATE)
                .as_i64()
                .is_some_and(|b| b >= 0 && bitrate.matches(b as u64));
            if !hit {
                return false;
            }
        }
        if let Some(gop) = self.gop {
            if table.get(row, GOP).as_i64() != Some(gop) {
                return false;
            }
        }
        if let Some(fps) = self.fps {
            if table.get(row, FPS).as_f64() != Some(fps) {
                return false;
            }
        }
        if let Some(size) = &self.size {
            let width = table.get(row, WIDTH).as_i64();
            let height = table.get(row, HEIGHT).as_i64();
            if !size.matches(width, height) {
                return false;
            }
        }
        true
    }
}

/// Rewrite the bitrate column as plain bits per second.
///
/// Stored values may carry a suffix ("300k"); missing cells stay missing.
pub fn normalize_bitrates(table: &mut IndexTable) -> Result<()> {
    let Some(idx) = table.column_index(BITRATE) else {
        return Ok(());
    };
    for row in &mut table.rows {
        let Some(cell) = row.values.get_mut(idx) else {
            continue;
        };
        let bps = match &*cell {
            Value::Missing => continue,
            Value::Int(i) if *i >= 0 => *i as u64,
            Value::Float(f) if *f >= 0.0 && f.fract() == 0.0 => *f as u64,
            Value::Str(s) => parse_bitrate(s)?,
            other => return Err(SearchError::parse(other.to_string(), "not a bitrate")),
        };
        *cell = Value::Int(bps as i64);
    }
    Ok(())
}

/// Sort rows by `SORT_COLUMNS`; ties keep their order.
pub fn sort_rows(table: &mut IndexTable) {
    static MISSING: Value = Value::Missing;
    let indices: Vec<usize> = SORT_COLUMNS
        .iter()
        .filter_map(|c| table.column_index(c))
        .collect();
    table.rows.sort_by(|a, b| {
        for &i in &indices {
            let x = a.values.get(i).unwrap_or(&MISSING);
            let y = b.values.get(i).unwrap_or(&MISSING);
            let ord = x.sort_cmp(y);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

/// Run a query against a loaded table, returning a new sorted table.
pub fn search(table: &IndexTable, spec: &FilterSpec) -> Result<IndexTable> {
    let mut normalized = table.clone();
    normalize_bitrates(&mut normalized)?;

    let mut result = IndexTable::new(normalized.columns.clone());
    for row in &normalized.rows {
        if spec.matches(&normalized, row) {
            result.rows.push(row.clone());
        }
    }
    sort_rows(&mut result);

    tracing::debug!(
        "Query {:?} matched {} of {} rows",
        spec,
        result.len(),
        table.len()
    );
    Ok(result)
}
