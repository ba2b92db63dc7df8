//! Integration tests for b2sync-sync
//!
//! Drives whole cycles through the public API with fake tools, a fake
//! process table and a recording notifier, plus a shell script standing in
//! for the real `b2` binary on unix.

mod common;

mod test_b2_script;
mod test_cycle;
mod test_notifications;
