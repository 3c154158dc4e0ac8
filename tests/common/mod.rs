//! Shared test support: an ordered event journal and programmable fake
//! subsystems for exercising the bootstrap sequence without touching the
//! host.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use notaryd::crypto::{CryptoInitError, CryptoSubsystem};
use notaryd::lifecycle::{ServerPayload, Subsystems};
use notaryd::net::stack::{SocketStack, StackError, StackVersion};
use notaryd::server::contract::ServerEndpoint;
use notaryd::server::instance::EndpointError;
use notaryd::storage::data_dir::{DataDirError, DataFolder};

/// One observable subsystem event, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    StackStartup,
    StackCleanup,
    StorageInit,
    CryptoInit,
    KeysReleased,
    CryptoShutdown,
    ServerConstructed,
    ServerDropped,
}

/// Shared, ordered record of subsystem events.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

/// Socket stack fake with a programmable negotiation result.
pub struct FakeStack {
    journal: Journal,
    pub fail_startup: bool,
    pub negotiate: Option<StackVersion>,
}

impl FakeStack {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail_startup: false,
            negotiate: None,
        }
    }
}

impl SocketStack for FakeStack {
    fn startup(&mut self, requested: StackVersion) -> Result<StackVersion, StackError> {
        if self.fail_startup {
            return Err(StackError::Probe(std::io::Error::other(
                "injected startup failure",
            )));
        }
        self.journal.record(Event::StackStartup);
        Ok(self.negotiate.unwrap_or(requested))
    }

    fn cleanup(&mut self) {
        self.journal.record(Event::StackCleanup);
    }
}

/// Data-folder fake.
pub struct FakeStorage {
    journal: Journal,
    pub fail_init: bool,
    pub report_uninitialized: bool,
    root: Option<PathBuf>,
}

impl FakeStorage {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail_init: false,
            report_uninitialized: false,
            root: None,
        }
    }
}

impl DataFolder for FakeStorage {
    fn init(&mut self, key: &str) -> Result<PathBuf, DataDirError> {
        if self.fail_init {
            return Err(DataDirError::NoBaseDirectory);
        }
        let root = PathBuf::from("/tmp/notaryd-fake").join(key);
        self.journal.record(Event::StorageInit);
        self.root = Some(root.clone());
        Ok(root)
    }

    fn is_initialized(&self) -> bool {
        !self.report_uninitialized && self.root.is_some()
    }

    fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

/// Crypto subsystem fake.
pub struct FakeCrypto {
    journal: Journal,
    pub fail_init: bool,
}

impl FakeCrypto {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail_init: false,
        }
    }
}

impl CryptoSubsystem for FakeCrypto {
    fn init(&mut self) -> Result<(), CryptoInitError> {
        if self.fail_init {
            return Err(CryptoInitError::SelfTest {
                algorithm: "sha-256",
            });
        }
        self.journal.record(Event::CryptoInit);
        Ok(())
    }

    fn release_cached_keys(&mut self) {
        self.journal.record(Event::KeysReleased);
    }

    fn shutdown(&mut self) {
        self.journal.record(Event::CryptoShutdown);
    }
}

/// Payload fake whose construction and destruction are journaled.
pub struct TestServer {
    journal: Journal,
    endpoint: Option<ServerEndpoint>,
}

impl TestServer {
    pub fn new(journal: &Journal, endpoint: Option<ServerEndpoint>) -> Self {
        journal.record(Event::ServerConstructed);
        Self {
            journal: journal.clone(),
            endpoint,
        }
    }
}

impl ServerPayload for TestServer {
    fn connect_info(&self) -> Result<ServerEndpoint, EndpointError> {
        self.endpoint
            .clone()
            .ok_or(EndpointError::ContractUnavailable)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.journal.record(Event::ServerDropped);
    }
}

/// A fully-working fake subsystem set recording into `journal`.
pub fn subsystems(journal: &Journal) -> Subsystems {
    Subsystems {
        net: Box::new(FakeStack::new(journal)),
        storage: Box::new(FakeStorage::new(journal)),
        crypto: Box::new(FakeCrypto::new(journal)),
    }
}

pub fn endpoint(port: u16) -> ServerEndpoint {
    ServerEndpoint {
        host: "notary.example".to_string(),
        port,
    }
}
