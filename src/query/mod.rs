//! Query module
//!
//! Parses filter tokens and applies them to a loaded index.

pub mod bitrate;
pub mod filter;

pub use bitrate::parse_bitrate;
pub use filter::{search, FilterSpec};
