//! Notary server daemon library.
//!
//! The crate's core is the lifecycle loader: it brings the process-wide
//! subsystems (socket stack, signal handling, data directory, crypto)
//! into a known-good state in a required order, constructs the server
//! instance, and guarantees reverse-order teardown on every exit path,
//! including partial failures during startup.

// Core subsystems
pub mod config;
pub mod lifecycle;
pub mod net;
pub mod server;
pub mod storage;

// Cross-cutting concerns
pub mod crypto;
pub mod observability;

pub use config::ServerConfig;
pub use lifecycle::{BootstrapError, ServerLoader, Shutdown};
pub use server::{ServerEndpoint, ServerInstance};
