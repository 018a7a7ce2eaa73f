//! Bitrate token parsing
//!
//! Accepts plain bits-per-second integers ("500000") and values with a
//! magnitude suffix ("200k", "1.5M", "2G").

use crate::error::{Result, SearchError};

/// Magnitude for a bitrate suffix character
fn suffix_multiplier(suffix: char) -> Option<u64> {
    match suffix {
        'k' | 'K' => Some(1_000),
        'm' | 'M' => Some(1_000_000),
        'g' | 'G' => Some(1_000_000_000),
        _ => None,
    }
}

/// Parse a bitrate token into bits per second.
pub fn parse_bitrate(token: &str) -> Result<u64> {
    let token = token.trim();
    let last = token
        .chars()
        .last()
        .ok_or_else(|| SearchError::parse(token, "empty bitrate"))?;

    if last.is_ascii_digit() {
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SearchError::parse(token, "not a number"));
        }
        return token
            .parse::<u64>()
            .map_err(|e| SearchError::parse(token, e.to_string()));
    }

    let multiplier = suffix_multiplier(last)
        .ok_or_else(|| SearchError::parse(token, format!("unknown bitrate suffix '{last}'")))?;
    let prefix = &token[..token.len() - last.len_utf8()];
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(SearchError::parse(token, "not a number"));
    }

    if prefix.contains('.') {
        let value: f64 = prefix
            .parse()
            .map_err(|_| SearchError::parse(token, "not a number"))?;
        return Ok((value * multiplier as f64).round() as u64);
    }

    let value: u64 = prefix
        .parse()
        .map_err(|e: std::num::ParseIntError| SearchError::parse(token, e.to_string()))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| SearchError::parse(token, "bitrate out of range"))
}
