//! Run cache: annotated outputs keyed by (input, model, pipeline).
//!
//! Re-running the same pipeline on the same input with the same model is
//! expensive and deterministic enough to skip. The cache is a JSON index
//! mapping a [`RunKey`] to the annotated output file from a previous run.
//! A corrupt index is discarded with a warning, never an error.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CacheError;

/// Index file name under the cache root.
const INDEX_FILE: &str = "index.json";

/// Identity of one pipeline run for cache purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunKey {
    /// Input file stem (e.g. `Q17_Responses`).
    pub input: String,
    /// Model name.
    pub model: String,
    /// Prompt strategy name.
    pub pipeline: String,
}

impl RunKey {
    /// Build a key from an input path, model, and pipeline name.
    pub fn new(input: &Path, model: impl Into<String>, pipeline: impl Into<String>) -> Self {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            input: stem,
            model: model.into(),
            pipeline: pipeline.into(),
        }
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.input, self.model, self.pipeline)
    }
}

/// On-disk cache of annotated pipeline outputs.
pub struct RunCache {
    root: PathBuf,
    index: BTreeMap<String, PathBuf>,
}

impl RunCache {
    /// Open the cache at the default coda cache directory.
    pub fn open_default() -> Self {
        Self::open(coda_paths::cache_dir())
    }

    /// Open the cache rooted at `root`, loading the index if present.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let index_path = root.join(INDEX_FILE);
        let index = match std::fs::read(&index_path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(index) => index,
                Err(error) => {
                    warn!(path = %index_path.display(), %error, "corrupt cache index, starting fresh");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { root, index }
    }

    /// Look up a cached output for `key`.
    ///
    /// Returns `None` if the key was never recorded or the cached file is
    /// gone from disk.
    pub fn get(&self, key: &RunKey) -> Option<PathBuf> {
        let path = self.index.get(&key.to_string())?;
        if path.exists() {
            debug!(key = %key, path = %path.display(), "cache hit");
            Some(path.clone())
        } else {
            warn!(key = %key, path = %path.display(), "cached output missing from disk");
            None
        }
    }

    /// Record `path` as the output for `key` and persist the index.
    pub fn put(&mut self, key: &RunKey, path: impl Into<PathBuf>) -> Result<(), CacheError> {
        self.index.insert(key.to_string(), path.into());
        self.persist()
    }

    /// Drop all recorded entries. Cached output files are left in place.
    pub fn clear(&mut self) -> Result<(), CacheError> {
        self.index.clear();
        self.persist()
    }

    /// All recorded (key, output path) entries.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.index
            .iter()
            .map(|(key, path)| (key.as_str(), path.as_path()))
    }

    fn persist(&self) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.root).map_err(|source| CacheError::Io {
            path: self.root.clone(),
            source,
        })?;
        let index_path = self.root.join(INDEX_FILE);
        let json = serde_json::to_string_pretty(&self.index)?;
        std::fs::write(&index_path, json).map_err(|source| CacheError::Io {
            path: index_path,
            source,
        })
    }
}
