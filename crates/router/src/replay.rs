//! Fork detection.
//!
//! The router remembers the chain id it was deployed on. Every transmission
//! first compares it against the host's current chain id, so a report signed
//! for one chain cannot be replayed on a fork of it.

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Source of the current execution context.
pub trait ChainContext: Send + Sync {
    /// Chain id the host is currently running on.
    fn chain_id(&self) -> u64;
}

/// Chain context backed by an in-memory id.
///
/// The id can be changed at runtime to simulate a fork.
#[derive(Debug)]
pub struct LocalChain {
    id: AtomicU64,
}

impl LocalChain {
    /// Create a context reporting `chain_id`.
    pub fn new(chain_id: u64) -> Self {
        Self {
            id: AtomicU64::new(chain_id),
        }
    }

    /// Change the reported chain id.
    pub fn set_chain_id(&self, chain_id: u64) {
        self.id.store(chain_id, Ordering::SeqCst);
    }
}

impl ChainContext for LocalChain {
    fn chain_id(&self) -> u64 {
        self.id.load(Ordering::SeqCst)
    }
}

/// The current chain id differs from the one captured at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Forked chain: expected chain id {expected}, actual {actual}")]
pub struct ForkedChain {
    /// Chain id captured at construction.
    pub expected: u64,
    /// Chain id observed at transmission time.
    pub actual: u64,
}

/// Rejects transmissions once the host has forked.
#[derive(Debug, Clone, Copy)]
pub struct ReplayGuard {
    expected: u64,
}

impl ReplayGuard {
    /// Capture the chain id to guard.
    pub fn new(expected: u64) -> Self {
        Self { expected }
    }

    /// Chain id captured at construction.
    pub fn expected(&self) -> u64 {
        self.expected
    }

    /// Check that `actual` is still the captured chain id.
    pub fn assert_live_context(&self, actual: u64) -> Result<(), ForkedChain> {
        if actual != self.expected {
            return Err(ForkedChain {
                expected: self.expected,
                actual,
            });
        }
        Ok(())
    }
}
