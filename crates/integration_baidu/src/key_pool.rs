//! Round-robin API key pool with per-key usage caps
//!
//! The pool is shared by every request the process makes, so the cap check
//! and the usage increment happen under one lock in [`KeyPool::checkout`].

use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::BaiduError;

/// Mask an API key for logs: first four characters, then `****`
#[must_use]
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}****")
}

struct Credential {
    key: String,
    usage: u32,
    daily_cap: u32,
}

impl Credential {
    const fn has_capacity(&self) -> bool {
        self.usage < self.daily_cap
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key", &mask_key(&self.key))
            .field("usage", &self.usage)
            .field("daily_cap", &self.daily_cap)
            .finish()
    }
}

#[derive(Debug)]
struct PoolState {
    credentials: Vec<Credential>,
    current: usize,
}

impl PoolState {
    fn advance(&mut self) {
        self.current = (self.current + 1) % self.credentials.len();
    }

    /// Walk from the pointer to the first key under its cap, leaving the
    /// pointer there.
    fn acquire(&mut self) -> Result<usize, BaiduError> {
        for _ in 0..self.credentials.len() {
            if self.credentials[self.current].has_capacity() {
                return Ok(self.current);
            }
            self.advance();
        }
        Err(BaiduError::QuotaExhausted {
            keys: self.credentials.len(),
        })
    }
}

/// Usage of a single key, safe to log or serialize
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialUsage {
    /// Masked key
    pub key: String,
    /// Requests made with this key
    pub usage: u32,
    /// Cap for this key
    pub daily_cap: u32,
}

/// Shared pool of API keys
#[derive(Debug)]
pub struct KeyPool {
    state: Mutex<PoolState>,
}

impl KeyPool {
    /// Create a pool where every key has the same cap
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if no keys are given.
    pub fn new<I, K>(keys: I, daily_cap: u32) -> Result<Self, BaiduError>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let credentials: Vec<Credential> = keys
            .into_iter()
            .map(|key| Credential {
                key: key.into(),
                usage: 0,
                daily_cap,
            })
            .collect();

        if credentials.is_empty() {
            return Err(BaiduError::ConfigurationError(
                "no API keys configured".to_string(),
            ));
        }

        Ok(Self {
            state: Mutex::new(PoolState {
                credentials,
                current: 0,
            }),
        })
    }

    /// Return the first key at or after the pointer that is still under its cap
    ///
    /// # Errors
    ///
    /// Returns `QuotaExhausted` when every key is at its cap.
    pub fn acquire(&self) -> Result<String, BaiduError> {
        let mut state = self.state.lock();
        let idx = state.acquire()?;
        Ok(state.credentials[idx].key.clone())
    }

    /// Count one request against `key`; unknown keys are ignored
    pub fn record_use(&self, key: &str) {
        let mut state = self.state.lock();
        if let Some(cred) = state.credentials.iter_mut().find(|c| c.key == key) {
            cred.usage = cred.usage.saturating_add(1);
        }
    }

    /// Move the pointer to the next key, wrapping around
    pub fn advance(&self) {
        let mut state = self.state.lock();
        state.advance();
        let current = state.current;
        debug!(
            key = %mask_key(&state.credentials[current].key),
            "Switched to next API key"
        );
    }

    /// Acquire a key and count the request in one step
    ///
    /// # Errors
    ///
    /// Returns `QuotaExhausted` when every key is at its cap.
    pub fn checkout(&self) -> Result<String, BaiduError> {
        let mut state = self.state.lock();
        let idx = match state.acquire() {
            Ok(idx) => idx,
            Err(e) => {
                warn!("All API keys reached their usage cap");
                return Err(e);
            },
        };
        let cred = &mut state.credentials[idx];
        cred.usage += 1;
        Ok(cred.key.clone())
    }

    /// Number of configured keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().credentials.len()
    }

    /// Whether the pool has no keys (never true for a constructed pool)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of keys still under their cap
    #[must_use]
    pub fn available(&self) -> usize {
        self.state
            .lock()
            .credentials
            .iter()
            .filter(|c| c.has_capacity())
            .count()
    }

    /// Masked usage of every key, in pool order
    #[must_use]
    pub fn usage_snapshot(&self) -> Vec<CredentialUsage> {
        self.state
            .lock()
            .credentials
            .iter()
            .map(|c| CredentialUsage {
                key: mask_key(&c.key),
                usage: c.usage,
                daily_cap: c.daily_cap,
            })
            .collect()
    }
}
