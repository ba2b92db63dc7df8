//! Process liveness port
//!
//! The lock file stores a PID. Deciding whether that PID still belongs to a
//! live process is an OS question, so it sits behind this trait and tests
//! can supply a fake process table.

/// Port trait for checking whether a process exists
pub trait IProcessProbe: Send + Sync {
    /// Returns `true` if a process with this ID is alive
    ///
    /// Implementations must not affect the target process.
    fn is_alive(&self, pid: u32) -> bool;
}
