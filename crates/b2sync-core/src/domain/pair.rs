//! Sync pair value type

use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// A local directory mirrored to a remote bucket location
///
/// Pairs come from configuration and are never mutated by the cycle logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPair {
    /// Local directory to upload from
    pub source: PathBuf,
    /// Remote location, e.g. `b2://bucket/prefix`
    pub destination: String,
}

impl SyncPair {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

impl fmt::Display for SyncPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source.display(), self.destination)
    }
}
