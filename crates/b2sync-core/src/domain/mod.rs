//! Domain entities and error taxonomy
//!
//! - [`SyncPair`] - one configured source directory to remote destination mapping
//! - [`SyncResult`] - what happened to one pair during one cycle
//! - [`CycleOutcome`] - per-pair results, or the reason the whole cycle was skipped
//! - Error types for lock, pair and cycle level failures

pub mod errors;
pub mod outcome;
pub mod pair;

pub use errors::{CycleError, LockError, PairError};
pub use outcome::{CycleOutcome, SyncResult};
pub use pair::SyncPair;
