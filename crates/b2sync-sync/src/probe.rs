//! OS process liveness adapter
//!
//! Implements [`IProcessProbe`] with `kill(pid, 0)`, which checks for process
//! existence without delivering a signal.

use b2sync_core::ports::IProcessProbe;

/// Probes the real process table
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProcessProbe;

impl OsProcessProbe {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl IProcessProbe for OsProcessProbe {
    #[cfg(unix)]
    fn is_alive(&self, pid: u32) -> bool {
        if pid == 0 {
            return false;
        }
        let Ok(pid) = libc::pid_t::try_from(pid) else {
            return false;
        };

        // SAFETY: signal 0 performs only the existence and permission checks.
        let result = unsafe { libc::kill(pid, 0) };
        if result == 0 {
            return true;
        }

        // EPERM: the process exists but belongs to someone else.
        std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
    }

    #[cfg(not(unix))]
    fn is_alive(&self, _pid: u32) -> bool {
        // No cheap probe here; a held lock is assumed live.
        true
    }
}
