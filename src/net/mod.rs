//! Networking subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap:
//!     stack.rs verifies the host socket stack before anything binds
//!
//! Serve:
//!     listener.rs accepts connections under a concurrency limit
//!         -> connections are drained and closed (no protocol layer here)
//! ```
//!
//! # Design Decisions
//! - The socket stack is a process-wide singleton owned by the lifecycle
//!   loader; nothing else starts or releases it
//! - Accept backpressure via semaphore permits held per connection

pub mod listener;
pub mod stack;

pub use listener::Listener;
pub use stack::{HostSocketStack, SocketStack, StackError, StackVersion, REQUIRED_STACK_VERSION};
