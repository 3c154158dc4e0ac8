//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; every subsystem transition is an event
//! - The filter directive comes from config, overridden by RUST_LOG

pub mod logging;
