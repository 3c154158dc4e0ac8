//! Lifecycle loader: brings the process-wide subsystems into a known-good
//! state in a required order and guarantees reverse-order teardown.
//!
//! # Data Flow
//! ```text
//! bootstrap():
//!     socket stack -> signal handler -> data directory -> crypto -> server
//!
//! teardown() (also invoked by Drop):
//!     server -> cached keys -> crypto -> data-dir flag -> socket stack
//! ```
//!
//! # Design Decisions
//! - Each acquisition step is gated on the previous one succeeding
//! - Readiness flags gate teardown, so a partially-failed bootstrap
//!   releases exactly what it acquired
//! - Teardown is idempotent; Drop reuses it, covering every exit path

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ServerConfig;
use crate::crypto::{CryptoEngine, CryptoInitError, CryptoSubsystem};
use crate::lifecycle::signals::{self, Shutdown};
use crate::net::stack::{
    HostSocketStack, SocketStack, StackError, StackVersion, REQUIRED_STACK_VERSION,
};
use crate::server::contract::ServerEndpoint;
use crate::server::instance::{EndpointError, ServerError, ServerInstance};
use crate::storage::data_dir::{DataDir, DataDirError, DataFolder, SERVER_DATA_SUBDIR};

/// Payload contract the loader requires of the server it hosts.
pub trait ServerPayload {
    /// The endpoint the payload advertises in its own contract data.
    fn connect_info(&self) -> Result<ServerEndpoint, EndpointError>;
}

/// Which subsystems have been successfully acquired.
///
/// Flags become true strictly in acquisition order and are cleared
/// strictly in reverse order during teardown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessFlags {
    pub socket_stack: bool,
    pub data_dir: bool,
    pub crypto: bool,
    pub server: bool,
}

/// The process-wide subsystem handles the loader sequences.
pub struct Subsystems {
    pub net: Box<dyn SocketStack>,
    pub storage: Box<dyn DataFolder>,
    pub crypto: Box<dyn CryptoSubsystem>,
}

/// Error type for bootstrap and endpoint queries.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("socket stack startup failed: {0}")]
    SocketStack(#[from] StackError),
    #[error("socket stack negotiated version {negotiated}, required {required}")]
    SocketStackVersion {
        required: StackVersion,
        negotiated: StackVersion,
    },
    #[error("data directory initialization failed: {0}")]
    DataDir(#[from] DataDirError),
    #[error("data directory did not report initialized after setup")]
    DataDirUnverified,
    #[error("crypto subsystem initialization failed: {0}")]
    Crypto(#[from] CryptoInitError),
    #[error("server construction failed: {0}")]
    Server(#[from] ServerError),
    #[error("server endpoint unavailable: {0}")]
    Endpoint(#[from] EndpointError),
    #[error("no server instance (loader already torn down)")]
    NotReady,
}

/// Sequences subsystem acquisition on bootstrap and reverse-order release
/// on teardown. Owns the server payload exclusively.
pub struct ServerLoader<S: ServerPayload = ServerInstance> {
    subsystems: Subsystems,
    server: Option<S>,
    data_root: Option<PathBuf>,
    flags: ReadinessFlags,
    shutdown: Shutdown,
}

impl ServerLoader<ServerInstance> {
    /// Bootstrap against the host subsystems.
    pub fn bootstrap(config: &ServerConfig) -> Result<Self, BootstrapError> {
        let engine = CryptoEngine::new();
        let keys = engine.key_cache();
        let contract_file = config.storage.contract_file.clone();

        let subsystems = Subsystems {
            net: Box::new(HostSocketStack::default()),
            storage: Box::new(DataDir::new(config.storage.data_dir.clone())),
            crypto: Box::new(engine),
        };

        Self::bootstrap_with(config, subsystems, move |data_dir| {
            ServerInstance::open(data_dir, &contract_file, keys)
        })
    }
}

impl<S: ServerPayload> ServerLoader<S> {
    /// Bootstrap against caller-supplied subsystem handles and a payload
    /// factory.
    ///
    /// Acquisition order: socket stack, signal handler (optional), data
    /// directory, crypto subsystem, server payload. Any failure tears
    /// down what was already acquired, in reverse order, before the error
    /// returns.
    pub fn bootstrap_with<F>(
        config: &ServerConfig,
        subsystems: Subsystems,
        build_server: F,
    ) -> Result<Self, BootstrapError>
    where
        F: FnOnce(&Path) -> Result<S, ServerError>,
    {
        let mut loader = Self {
            subsystems,
            server: None,
            data_root: None,
            flags: ReadinessFlags::default(),
            shutdown: Shutdown::new(),
        };

        if let Err(err) = loader.acquire(config, build_server) {
            loader.teardown();
            return Err(err);
        }
        Ok(loader)
    }

    fn acquire<F>(&mut self, config: &ServerConfig, build_server: F) -> Result<(), BootstrapError>
    where
        F: FnOnce(&Path) -> Result<S, ServerError>,
    {
        let negotiated = self.subsystems.net.startup(REQUIRED_STACK_VERSION)?;
        if negotiated != REQUIRED_STACK_VERSION {
            // The stack came up at the wrong version; its partial state
            // must not outlive the failed negotiation.
            self.subsystems.net.cleanup();
            return Err(BootstrapError::SocketStackVersion {
                required: REQUIRED_STACK_VERSION,
                negotiated,
            });
        }
        self.flags.socket_stack = true;
        tracing::info!(version = %negotiated, "socket stack ready");

        if config.signals.install {
            signals::install_once(&self.shutdown);
        }

        let root = self.subsystems.storage.init(SERVER_DATA_SUBDIR)?;
        if !self.subsystems.storage.is_initialized() {
            return Err(BootstrapError::DataDirUnverified);
        }
        self.flags.data_dir = true;
        self.data_root = Some(root.clone());
        tracing::info!(path = %root.display(), "data directory ready");

        self.subsystems.crypto.init()?;
        self.flags.crypto = true;
        tracing::info!("crypto subsystem ready");

        let server = build_server(&root)?;
        self.server = Some(server);
        self.flags.server = true;
        tracing::info!("server instance constructed");

        Ok(())
    }

    /// Release every acquired subsystem in reverse order.
    ///
    /// Steps whose readiness flag is false are skipped, so a partially
    /// failed bootstrap and a repeated teardown are both safe.
    pub fn teardown(&mut self) {
        if self.flags.server {
            self.server = None;
            self.flags.server = false;
            tracing::info!("server instance destroyed");
        }
        if self.flags.crypto {
            self.subsystems.crypto.release_cached_keys();
            self.subsystems.crypto.shutdown();
            self.flags.crypto = false;
            tracing::info!("crypto subsystem shut down");
        }
        if self.flags.data_dir {
            // Nothing on disk to release; the flag still clears in order.
            self.flags.data_dir = false;
        }
        if self.flags.socket_stack {
            self.subsystems.net.cleanup();
            self.flags.socket_stack = false;
            tracing::info!("socket stack released");
        }
    }

    /// Borrow the owned server payload. The loader retains ownership.
    pub fn server(&self) -> Option<&S> {
        self.server.as_ref()
    }

    /// The port the server advertises in its own contract data.
    pub fn listen_port(&self) -> Result<u16, BootstrapError> {
        let server = self.server.as_ref().ok_or(BootstrapError::NotReady)?;
        let endpoint = server.connect_info()?;
        Ok(endpoint.port)
    }

    /// Readiness of each subsystem, in acquisition order.
    pub fn flags(&self) -> ReadinessFlags {
        self.flags
    }

    /// The resolved data directory, if storage initialization succeeded.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_root.as_deref()
    }

    /// Handle to the shutdown coordinator the signal handler triggers.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }
}

impl<S: ServerPayload> Drop for ServerLoader<S> {
    fn drop(&mut self) {
        if self.flags != ReadinessFlags::default() {
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                "shutting down and cleaning up"
            );
        }
        self.teardown();
    }
}
