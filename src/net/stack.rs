//! Platform socket-stack startup and release.
//!
//! # Responsibilities
//! - Verify the host socket stack is usable before anything binds
//! - Negotiate the required stack version during startup
//! - Release the stack exactly once during teardown
//!
//! # Design Decisions
//! - The stdlib owns platform socket-library startup on every supported
//!   target, so the host implementation probes instead of re-initializing
//! - Startup is single-owner: a second startup on the same handle is an error
//! - Version negotiation stays on the trait so a backend that genuinely
//!   negotiates with the platform can report what it got

use std::net::TcpListener;

/// Socket stack version as a (major, minor) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackVersion {
    pub major: u8,
    pub minor: u8,
}

impl StackVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl std::fmt::Display for StackVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Stack version requested at startup.
pub const REQUIRED_STACK_VERSION: StackVersion = StackVersion::new(2, 2);

/// Error type for socket-stack operations.
#[derive(Debug)]
pub enum StackError {
    /// Startup called on a handle that already started the stack.
    AlreadyStarted,
    /// The loopback probe could not bind a socket.
    Probe(std::io::Error),
}

impl std::fmt::Display for StackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackError::AlreadyStarted => write!(f, "socket stack already started"),
            StackError::Probe(e) => write!(f, "loopback probe failed: {}", e),
        }
    }
}

impl std::error::Error for StackError {}

/// Boundary for the process-wide socket stack singleton.
pub trait SocketStack: Send {
    /// Start the stack, negotiating `requested`. Returns the negotiated
    /// version, which the caller must verify.
    fn startup(&mut self, requested: StackVersion) -> Result<StackVersion, StackError>;

    /// Release the stack. Only valid after a successful `startup`.
    fn cleanup(&mut self);
}

/// Host socket stack.
///
/// Startup proves the stack can hand out sockets by binding an ephemeral
/// loopback listener, then reports the requested version as negotiated.
#[derive(Debug, Default)]
pub struct HostSocketStack {
    started: bool,
}

impl SocketStack for HostSocketStack {
    fn startup(&mut self, requested: StackVersion) -> Result<StackVersion, StackError> {
        if self.started {
            return Err(StackError::AlreadyStarted);
        }

        let probe = TcpListener::bind(("127.0.0.1", 0)).map_err(StackError::Probe)?;
        drop(probe);

        self.started = true;
        tracing::debug!(version = %requested, "socket stack started");
        Ok(requested)
    }

    fn cleanup(&mut self) {
        if self.started {
            self.started = false;
            tracing::debug!("socket stack released");
        }
    }
}
