//! Cooperative single-instance lock
//!
//! A [`PidLock`] is a small text file holding the decimal PID of the process
//! currently running a cycle. It is advisory: a second process on the same
//! host reads it and yields, nothing in the kernel enforces it.
//!
//! ## Lifecycle
//!
//! 1. [`PidLock::is_running`] reads the token. Missing means free. A corrupt
//!    token or one naming a dead process is deleted and treated as free.
//! 2. [`PidLock::acquire`] writes the current PID and returns a [`LockGuard`].
//! 3. Dropping the guard deletes the token, whether the cycle finished,
//!    returned early or panicked.
//!
//! Checking and acquiring are two separate steps, so two processes starting
//! at the same instant can both get through. That window is accepted for a
//! single-host tool on a minutes-long cadence.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use b2sync_core::{domain::LockError, ports::IProcessProbe};
use tracing::{debug, info, warn};

/// PID file lock with an injected liveness probe
pub struct PidLock {
    path: PathBuf,
    probe: Arc<dyn IProcessProbe>,
}

impl PidLock {
    /// Creates a lock backed by the file at `path`
    ///
    /// Nothing is touched on disk until the lock is inspected or acquired.
    pub fn new(path: impl Into<PathBuf>, probe: Arc<dyn IProcessProbe>) -> Self {
        Self {
            path: path.into(),
            probe,
        }
    }

    /// Location of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the PID of the live process holding the lock, if any
    ///
    /// Corrupt and stale tokens are deleted on the way.
    ///
    /// # Errors
    /// Returns [`LockError::Read`] if the token exists but cannot be read.
    pub fn holder(&self) -> Result<Option<u32>, LockError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(LockError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let parsed = std::str::from_utf8(&bytes)
            .ok()
            .and_then(|text| text.trim().parse::<u32>().ok())
            .filter(|&pid| pid > 0);
        let pid = match parsed {
            Some(pid) => pid,
            None => {
                warn!(
                    path = %self.path.display(),
                    content = %String::from_utf8_lossy(&bytes).trim(),
                    "Lock file is corrupt, removing it"
                );
                self.remove_token();
                return Ok(None);
            }
        };

        if !self.probe.is_alive(pid) {
            info!(
                path = %self.path.display(),
                pid,
                "Removing stale lock left by a process that is no longer running"
            );
            self.remove_token();
            return Ok(None);
        }

        Ok(Some(pid))
    }

    /// Whether a live process currently holds the lock
    pub fn is_running(&self) -> Result<bool, LockError> {
        Ok(self.holder()?.is_some())
    }

    /// Writes the current process ID as the token
    ///
    /// Call only after [`is_running`](Self::is_running) returned `false`.
    /// The returned guard releases the lock when dropped.
    ///
    /// # Errors
    /// Returns [`LockError::CreateDir`] or [`LockError::Write`] if the token
    /// cannot be persisted.
    pub fn acquire(&self) -> Result<LockGuard<'_>, LockError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| LockError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let pid = std::process::id();
        fs::write(&self.path, pid.to_string()).map_err(|source| LockError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), pid, "Lock acquired");
        Ok(LockGuard { lock: self })
    }

    /// Deletes the token; a missing file is fine
    ///
    /// Never fails. Other errors are logged.
    pub fn release(&self) {
        self.remove_token();
        debug!(path = %self.path.display(), "Lock released");
    }

    fn remove_token(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to remove lock file");
            }
        }
    }
}

impl std::fmt::Debug for PidLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PidLock").field("path", &self.path).finish()
    }
}

/// Scoped ownership of a [`PidLock`]
///
/// Releases the lock on drop, including during unwinding.
#[must_use = "the lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LockGuard<'a> {
    lock: &'a PidLock,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
