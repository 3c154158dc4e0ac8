//! Server payload: constructed by the lifecycle loader once every
//! prerequisite subsystem is ready.
//!
//! # Responsibilities
//! - Own the parsed contract and answer endpoint queries from it
//! - Register the contract signing key with the cached-key store
//! - Accept connections until shutdown (request handling lives elsewhere)

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::sync::broadcast;

use crate::config::ListenerConfig;
use crate::crypto::KeyCache;
use crate::net::listener::{Listener, ListenerError};
use crate::server::contract::{ContractError, ServerContract, ServerEndpoint};

use ed25519_dalek::Verifier;

const KEY_ATTESTATION: &[u8] = b"contract key attestation";

/// Error type for server construction.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The contract file exists but could not be read.
    #[error("failed to read server contract {path:?}: {source}")]
    ContractRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Error type for endpoint queries.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("no server contract loaded")]
    ContractUnavailable,
    #[error("contract advertises port 0, which cannot be listened on")]
    UnroutablePort,
}

/// Error type for the serve loop.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// The running notary server payload.
///
/// Exclusively owned by the lifecycle loader; everything else sees it
/// through a borrow.
pub struct ServerInstance {
    contract: Option<ServerContract>,
    keys: KeyCache,
}

impl ServerInstance {
    /// Construct the payload, loading the contract from `data_dir`.
    ///
    /// An absent or malformed contract is not a construction failure: the
    /// instance comes up without endpoint data and endpoint queries fail
    /// until a valid contract is in place. An unreadable contract file is
    /// a construction failure.
    pub fn open(data_dir: &Path, contract_file: &str, keys: KeyCache) -> Result<Self, ServerError> {
        let path = data_dir.join(contract_file);
        let contract = match ServerContract::load(&path) {
            Ok(contract) => Some(contract),
            Err(ContractError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    path = %path.display(),
                    "no server contract; endpoint queries will fail"
                );
                None
            }
            Err(ContractError::Read { path, source }) => {
                return Err(ServerError::ContractRead { path, source });
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "malformed server contract; endpoint queries will fail"
                );
                None
            }
        };

        let instance = Self { contract, keys };
        instance.register_signing_key();
        Ok(instance)
    }

    /// Construct the payload from an already-parsed contract.
    pub fn with_contract(contract: ServerContract, keys: KeyCache) -> Self {
        let instance = Self {
            contract: Some(contract),
            keys,
        };
        instance.register_signing_key();
        instance
    }

    fn register_signing_key(&self) {
        let Some(contract) = &self.contract else {
            return;
        };
        match contract.signing_key() {
            Ok(key) => {
                let verifying = key.verifying_key();
                self.keys.insert(contract.notary_id.clone(), key);

                // Round-trip through the cache proves the key that will sign
                // for this notary is the one the contract advertises.
                let attested = self
                    .keys
                    .sign(&contract.notary_id, KEY_ATTESTATION)
                    .is_some_and(|sig| verifying.verify(KEY_ATTESTATION, &sig).is_ok());
                if attested {
                    tracing::info!(
                        notary_id = %contract.notary_id,
                        public_key = %hex::encode(verifying.to_bytes()),
                        "contract signing key cached"
                    );
                } else {
                    tracing::warn!(
                        notary_id = %contract.notary_id,
                        "cached signing key failed attestation"
                    );
                }
            }
            Err(err) => {
                tracing::warn!(
                    notary_id = %contract.notary_id,
                    error = %err,
                    "contract signing key unavailable"
                );
            }
        }
    }

    /// The loaded contract, if any.
    pub fn contract(&self) -> Option<&ServerContract> {
        self.contract.as_ref()
    }

    /// The endpoint this server advertises in its own contract.
    pub fn connect_info(&self) -> Result<ServerEndpoint, EndpointError> {
        let contract = self
            .contract
            .as_ref()
            .ok_or(EndpointError::ContractUnavailable)?;
        let endpoint = contract.endpoint();
        if endpoint.port == 0 {
            return Err(EndpointError::UnroutablePort);
        }
        Ok(endpoint)
    }

    /// Accept connections until the shutdown signal fires.
    ///
    /// Request handling is not this crate's concern: accepted connections
    /// are drained to EOF and closed.
    pub async fn serve(
        &self,
        config: &ListenerConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServeError> {
        let endpoint = self.connect_info()?;
        let bind_addr = SocketAddr::from(([0, 0, 0, 0], endpoint.port));
        let listener = Listener::bind(bind_addr, config.max_connections).await?;

        tracing::info!(endpoint = %endpoint, "server accepting connections");

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("shutdown signal received, server stopping");
                    return Ok(());
                }
                accepted = listener.accept() => {
                    let (stream, peer, permit) = accepted?;
                    tokio::spawn(async move {
                        drain_connection(stream, peer).await;
                        drop(permit);
                    });
                }
            }
        }
    }
}

impl Drop for ServerInstance {
    fn drop(&mut self) {
        tracing::debug!("server instance dropped");
    }
}

impl crate::lifecycle::ServerPayload for ServerInstance {
    fn connect_info(&self) -> Result<ServerEndpoint, EndpointError> {
        ServerInstance::connect_info(self)
    }
}

async fn drain_connection(mut stream: tokio::net::TcpStream, peer: SocketAddr) {
    let mut sink = [0u8; 4096];
    let mut total = 0usize;
    loop {
        match stream.read(&mut sink).await {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(err) => {
                tracing::debug!(peer = %peer, error = %err, "connection read failed");
                break;
            }
        }
    }
    tracing::debug!(peer = %peer, bytes = total, "connection closed");
}
