//! Server contract: the self-describing document a server derives its
//! identity and endpoint from.

use std::fs;
use std::path::{Path, PathBuf};

use ed25519_dalek::SigningKey;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroize;

/// Network endpoint a server advertises in its contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    pub host: String,
    pub port: u16,
}

impl std::fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Error type for contract loading.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("failed to read contract {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse contract: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("contract host is empty")]
    EmptyHost,
    #[error("contract signing seed must be 64 hex characters")]
    InvalidSeed,
}

/// Parsed server contract.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerContract {
    /// Identifier the server registers its signing key under.
    pub notary_id: String,
    /// Hostname the server advertises to peers.
    pub host: String,
    /// Port the server listens on.
    pub port: u16,
    /// Hex-encoded 32-byte Ed25519 seed for the contract signing key.
    pub signing_seed: String,
}

impl ServerContract {
    /// Load and validate a contract document.
    pub fn load(path: &Path) -> Result<Self, ContractError> {
        let raw = fs::read_to_string(path).map_err(|source| ContractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let contract: Self = toml::from_str(&raw)?;
        if contract.host.is_empty() {
            return Err(ContractError::EmptyHost);
        }
        Ok(contract)
    }

    /// The endpoint this contract advertises.
    pub fn endpoint(&self) -> ServerEndpoint {
        ServerEndpoint {
            host: self.host.clone(),
            port: self.port,
        }
    }

    /// Derive the contract signing key from the embedded seed.
    ///
    /// Decoded seed bytes are zeroized once the key is built.
    pub fn signing_key(&self) -> Result<SigningKey, ContractError> {
        let mut decoded = hex::decode(&self.signing_seed).map_err(|_| ContractError::InvalidSeed)?;
        if decoded.len() != 32 {
            decoded.zeroize();
            return Err(ContractError::InvalidSeed);
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&decoded);
        decoded.zeroize();

        let key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(key)
    }
}
