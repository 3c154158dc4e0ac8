//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap (loader.rs):
//!     socket stack -> signal handler -> data directory -> crypto -> server
//!
//! Teardown (loader.rs, strict reverse order):
//!     server -> cached keys -> crypto -> socket stack
//!
//! Signals (signals.rs):
//!     SIGTERM / Ctrl-C -> shutdown broadcast -> serve loop exits
//! ```
//!
//! # Design Decisions
//! - Ordered startup; any failure is fatal and releases what was acquired
//! - Readiness flags make teardown partial-failure-safe and idempotent
//! - Signal installation is optional and happens exactly once per process

pub mod loader;
pub mod signals;

pub use loader::{BootstrapError, ReadinessFlags, ServerLoader, ServerPayload, Subsystems};
pub use signals::Shutdown;
