//! Server payload subsystem.
//!
//! # Data Flow
//! ```text
//! <data dir>/notary.toml
//!     -> contract.rs (parse, validate, derive signing key)
//!     -> instance.rs (own the contract, cache the key)
//!     -> connect_info() answers endpoint queries from contract data
//!     -> serve() accepts connections until shutdown fires
//! ```
//!
//! # Design Decisions
//! - The listening endpoint comes from the server's own contract, never
//!   from command-line input
//! - An absent or malformed contract defers to a fatal endpoint-query
//!   failure rather than failing construction
//! - Request handling is an external concern; accepted connections are
//!   drained and closed

pub mod contract;
pub mod instance;

pub use contract::{ContractError, ServerContract, ServerEndpoint};
pub use instance::{EndpointError, ServeError, ServerError, ServerInstance};
