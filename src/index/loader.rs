//! Index loader with one-shot rebuild
//!
//! Loading goes `Unloaded -> Loading -> Loaded`. When the index file is
//! missing or malformed the loader rebuilds it once and reads it again;
//! a second failure leaves the cache in `Failed`, which is terminal.

use std::path::{Path, PathBuf};

use crate::config::SearchConfig;
use crate::error::{IndexLoadError, Result, SearchError};
use crate::index::{build_index, IndexTable};

/// Load state of an `IndexCache`
#[derive(Debug)]
pub enum LoadState {
    Unloaded,
    Loading,
    Rebuilding,
    Loaded(IndexTable),
    Failed(IndexLoadError),
}

/// Lazily loaded index for one search root
#[derive(Debug)]
pub struct IndexCache {
    root: PathBuf,
    config: SearchConfig,
    recursive: bool,
    state: LoadState,
    rebuilds: usize,
}

impl IndexCache {
    pub fn new(root: impl Into<PathBuf>, config: SearchConfig, recursive: bool) -> Self {
        Self {
            root: root.into(),
            config,
            recursive,
            state: LoadState::Unloaded,
            rebuilds: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.config.index_path(&self.root)
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Number of rebuilds triggered by failed loads
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Rebuild the index unconditionally and drop any loaded table.
    pub fn reindex(&mut self) -> Result<()> {
        build_index(&self.root, &self.config, self.recursive)?;
        self.state = LoadState::Unloaded;
        Ok(())
    }

    /// Return the table, reading (and if needed rebuilding) the index file.
    pub fn load(&mut self) -> Result<&IndexTable> {
        if matches!(self.state, LoadState::Unloaded) {
            self.state = self.transition();
        }
        match &self.state {
            LoadState::Loaded(table) => Ok(table),
            LoadState::Failed(err) => Err(err.clone().into()),
            LoadState::Unloaded | LoadState::Loading | LoadState::Rebuilding => {
                Err(SearchError::IndexLoad(IndexLoadError::Malformed {
                    path: self.index_path(),
                    reason: "load did not complete".to_string(),
                }))
            }
        }
    }

    fn transition(&mut self) -> LoadState {
        let path = self.index_path();
        self.state = LoadState::Loading;
        let err = match IndexTable::read_from(&path) {
            Ok(table) => return LoadState::Loaded(table),
            Err(err) => err,
        };

        match &err {
            IndexLoadError::Missing(_) => tracing::warn!("Recreating {:?}", path),
            IndexLoadError::Malformed { reason, .. }
            | IndexLoadError::RebuildFailed { reason, .. } => {
                tracing::warn!("Error when reading {:?} ({}), reindexing", path, reason)
            }
        }

        self.state = LoadState::Rebuilding;
        self.rebuilds += 1;
        if let Err(e) = build_index(&self.root, &self.config, self.recursive) {
            tracing::error!("Rebuilding {:?} failed: {}", path, e);
            return LoadState::Failed(IndexLoadError::RebuildFailed {
                path,
                reason: e.to_string(),
            });
        }

        match IndexTable::read_from(&path) {
            Ok(table) => LoadState::Loaded(table),
            Err(e) => {
                tracing::error!("Failed to read index file {:?}: {}", path, e);
                LoadState::Failed(e)
            }
        }
    }
}
