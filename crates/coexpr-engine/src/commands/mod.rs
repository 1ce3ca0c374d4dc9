//! Command orchestration layer.
//!
//! Each command opens a [`Session`](coexpr_store::Session), applies core
//! operations and importers, and decides whether anything is persisted.
//!
//! ## Logging Ownership
//!
//! Commands own lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Store and core only emit `tracing::debug!` and per-row
//! `tracing::warn!` events. Every command runs under a fresh
//! [`RunContext`](coexpr_core_types::RunContext) whose run id is attached to
//! its log events and to the error it returns.

pub mod coexpr;
pub mod database;
