//! Featuriser configuration
//!
//! Settings for a featurisation run, loadable from a JSON file. Missing
//! fields take their defaults, so `{}` is a valid configuration.

use crate::error::{EmbeddingError, Result};
use crate::featurise::BatchOptions;
use crate::pooling::PoolingStat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default embedding preset.
pub const DEFAULT_PRESET: &str = "magpie";

/// Which preset to load, where to find it, and how to pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturiserConfig {
    /// Preset name passed to the resolver.
    pub preset: String,
    /// Directory holding preset files; `None` means the working directory.
    pub data_dir: Option<PathBuf>,
    /// Statistics to pool, in output order.
    pub stats: Vec<PoolingStat>,
    /// Abort a batch on its first bad formula.
    pub strict: bool,
    /// Fan batches out over the rayon pool.
    pub parallel: bool,
}

impl Default for FeaturiserConfig {
    fn default() -> Self {
        Self {
            preset: DEFAULT_PRESET.to_string(),
            data_dir: None,
            stats: vec![PoolingStat::Mean],
            strict: false,
            parallel: true,
        }
    }
}

impl FeaturiserConfig {
    /// Default configuration pooling with every statistic.
    pub fn all_stats() -> Self {
        Self {
            stats: PoolingStat::ALL.to_vec(),
            ..Self::default()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EmbeddingError::Config(e.to_string()))
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| EmbeddingError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Data directory, falling back to the working directory.
    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_deref().unwrap_or(Path::new("."))
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            strict: self.strict,
            parallel: self.parallel,
        }
    }
}
