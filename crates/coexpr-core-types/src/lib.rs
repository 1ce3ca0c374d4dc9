//! Core types shared across coexpr facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Run correlation**: RunId, RunContext
//! - **Schema constants**: lifecycle field keys and event names

pub mod run_context;
pub mod schema;

pub use run_context::{RunContext, RunId};
