//! Result indexing module
//!
//! This module builds and loads the flat index of encapp results:
//! - Result file discovery below a search root
//! - Result and device descriptor parsing
//! - Flattening of the nested test configuration into columns
//! - Writing the index file, and loading it with a one-shot rebuild

pub mod builder;
pub mod flatten;
pub mod loader;
pub mod record;
pub mod scanner;
pub mod table;

pub use builder::build_index;
pub use loader::IndexCache;
pub use table::{IndexRow, IndexTable, Value};
