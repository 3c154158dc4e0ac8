//! Storage subsystem.
//!
//! # Data Flow
//! ```text
//! config override (or platform data dir)
//!     -> data_dir.rs (resolve, create, write-probe)
//!     -> validated root handed to the lifecycle loader
//!     -> server contract loaded from <root>/<contract file>
//! ```
//!
//! # Design Decisions
//! - The data directory is resolved once per process, by the loader
//! - Validation means proving the tree exists and accepts writes, not
//!   trusting that it will

pub mod data_dir;

pub use data_dir::{DataDir, DataDirError, DataFolder, SERVER_DATA_SUBDIR};
