//! Configuration types for archive loading and analysis.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`ArchiveConfig`] - how archive text is decoded
//! - [`AnalysisConfig`] - how the parallel emoji scan is scheduled
//!
//! # Example
//!
//! ```rust
//! use chatlens::config::{AnalysisConfig, ArchiveConfig};
//!
//! let archive = ArchiveConfig::new().with_fix_encoding(false);
//! let analysis = AnalysisConfig::new().with_max_workers(2);
//!
//! assert!(!archive.fix_encoding);
//! assert_eq!(analysis.worker_count(8), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::normalize::normalize;

/// Configuration for Messenger archive loading.
///
/// Messenger archives store UTF-8 text as Latin-1 codepoints (Mojibake).
/// The loader repairs this by default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Repair the Latin-1-over-UTF-8 encoding (default: true)
    ///
    /// Turn this off only for archives that were already re-encoded to
    /// clean UTF-8, where the repair would fail on legitimate accents.
    pub fix_encoding: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self { fix_encoding: true }
    }
}

impl ArchiveConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to fix Mojibake encoding.
    #[must_use]
    pub fn with_fix_encoding(mut self, fix: bool) -> Self {
        self.fix_encoding = fix;
        self
    }

    /// Applies the configured encoding repair to one archive string.
    pub fn repair(&self, raw: &str) -> Result<String> {
        if self.fix_encoding {
            normalize(raw)
        } else {
            Ok(raw.to_owned())
        }
    }
}

/// Configuration for conversation analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Upper bound on emoji-scan worker threads (default: none)
    ///
    /// The scan never uses more workers than there are participants or
    /// available cores, whatever this is set to.
    pub max_workers: Option<usize>,
}

impl AnalysisConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of emoji-scan workers.
    #[must_use]
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = Some(workers);
        self
    }

    /// Number of workers to use for `tasks` independent tasks.
    ///
    /// Always at least 1.
    pub fn worker_count(&self, tasks: usize) -> usize {
        let cpu_count = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4);

        let mut workers = tasks.min(cpu_count);
        if let Some(cap) = self.max_workers {
            workers = workers.min(cap);
        }
        workers.max(1)
    }
}
