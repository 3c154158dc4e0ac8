//! Cryptographic subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap:
//!     engine.rs init -> power-on known-answer checks -> engine ready
//!
//! Runtime:
//!     server instance derives its contract key -> keystore.rs caches it
//!
//! Teardown (ordered by the lifecycle loader):
//!     keystore release_all (keys zeroized on drop) -> engine shutdown
//! ```
//!
//! # Design Decisions
//! - A failed power-on check means the process must not start
//! - Key release and engine shutdown are separate steps so teardown can
//!   order them explicitly

pub mod engine;
pub mod keystore;

pub use engine::{CryptoEngine, CryptoInitError, CryptoSubsystem};
pub use keystore::KeyCache;
