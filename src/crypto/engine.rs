//! Cryptographic subsystem initialization and teardown.
//!
//! # Responsibilities
//! - Bring the crypto library into a ready state before the server exists
//! - Prove the primitives work with power-on known-answer checks
//! - Own the process-wide cached-key store and release it on teardown

use ed25519_dalek::{Signer, SigningKey, Verifier};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::crypto::keystore::KeyCache;

/// SHA-256 of "abc", the classic FIPS 180 check value.
const SHA256_CHECK_INPUT: &[u8] = b"abc";
const SHA256_CHECK_DIGEST: &str =
    "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

/// Error type for crypto subsystem initialization.
#[derive(Debug, Error)]
pub enum CryptoInitError {
    #[error("{algorithm} power-on check failed")]
    SelfTest { algorithm: &'static str },
    #[error("crypto subsystem already initialized")]
    AlreadyInitialized,
}

/// Boundary for the process-wide cryptographic subsystem.
pub trait CryptoSubsystem: Send {
    /// Initialize the subsystem. Failure is fatal to the bootstrap sequence.
    fn init(&mut self) -> Result<(), CryptoInitError>;

    /// Drop all cached key material.
    fn release_cached_keys(&mut self);

    /// Shut the subsystem down. Only valid after a successful `init`.
    fn shutdown(&mut self);
}

/// Host crypto engine.
pub struct CryptoEngine {
    keys: KeyCache,
    ready: bool,
}

impl CryptoEngine {
    pub fn new() -> Self {
        Self {
            keys: KeyCache::new(),
            ready: false,
        }
    }

    /// Handle to the cached-key store, shared with the server instance.
    pub fn key_cache(&self) -> KeyCache {
        self.keys.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    fn check_sha256() -> Result<(), CryptoInitError> {
        let digest = Sha256::digest(SHA256_CHECK_INPUT);
        if hex::encode(digest) != SHA256_CHECK_DIGEST {
            return Err(CryptoInitError::SelfTest {
                algorithm: "sha-256",
            });
        }
        Ok(())
    }

    fn check_ed25519() -> Result<(), CryptoInitError> {
        let key = SigningKey::from_bytes(&[0x42; 32]);
        let message = b"notaryd crypto power-on check";
        let signature = key.sign(message);
        key.verifying_key()
            .verify(message, &signature)
            .map_err(|_| CryptoInitError::SelfTest {
                algorithm: "ed25519",
            })
    }
}

impl Default for CryptoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoSubsystem for CryptoEngine {
    fn init(&mut self) -> Result<(), CryptoInitError> {
        if self.ready {
            return Err(CryptoInitError::AlreadyInitialized);
        }
        Self::check_sha256()?;
        Self::check_ed25519()?;
        self.ready = true;
        tracing::debug!("crypto subsystem ready");
        Ok(())
    }

    fn release_cached_keys(&mut self) {
        self.keys.release_all();
    }

    fn shutdown(&mut self) {
        if self.ready {
            self.ready = false;
            tracing::debug!("crypto subsystem shut down");
        }
    }
}
