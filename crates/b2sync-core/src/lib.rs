//! B2Sync Core - Domain types, configuration and ports
//!
//! This crate holds everything the sync orchestration needs to talk about
//! without touching the operating system:
//! - **Domain types** - `SyncPair`, `SyncResult`, `CycleOutcome` and the error taxonomy
//! - **Configuration** - YAML-backed settings with defaults, validation and a builder
//! - **Port definitions** - Traits for adapters: `ISyncTool`, `IProcessProbe`, `INotificationService`
//!
//! # Architecture
//!
//! Ports define the seams the sync crate depends on. Real implementations
//! (the `b2` command, `kill(pid, 0)`, desktop notifications) live in adapter
//! crates, so the cycle logic can be exercised against fakes.

pub mod config;
pub mod domain;
pub mod ports;
