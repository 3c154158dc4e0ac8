//! Process-wide cache of server signing keys.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ed25519_dalek::{Signature, Signer, SigningKey};

/// Shared handle to the cached signing keys.
///
/// Keys are inserted when a server instance derives its contract key and
/// dropped en masse during teardown. `SigningKey` zeroizes its material
/// when dropped.
#[derive(Clone, Default)]
pub struct KeyCache {
    inner: Arc<Mutex<HashMap<String, SigningKey>>>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache a signing key under `id`, replacing any previous entry.
    pub fn insert(&self, id: impl Into<String>, key: SigningKey) {
        self.inner
            .lock()
            .expect("key cache lock poisoned")
            .insert(id.into(), key);
    }

    /// Whether a key is cached under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.inner
            .lock()
            .expect("key cache lock poisoned")
            .contains_key(id)
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("key cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sign `message` with the key cached under `id`.
    pub fn sign(&self, id: &str, message: &[u8]) -> Option<Signature> {
        self.inner
            .lock()
            .expect("key cache lock poisoned")
            .get(id)
            .map(|key| key.sign(message))
    }

    /// Drop every cached key. Key material is zeroized as entries drop.
    pub fn release_all(&self) {
        let mut cache = self.inner.lock().expect("key cache lock poisoned");
        let released = cache.len();
        cache.clear();
        if released > 0 {
            tracing::info!(released, "cached key material released");
        }
    }
}

impl std::fmt::Debug for KeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCache").field("len", &self.len()).finish()
    }
}
