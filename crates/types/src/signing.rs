//! Report signing messages and signature sets.
//!
//! Oracles sign a single 32-byte digest per report:
//!
//! | Field | Content |
//! |-------|---------|
//! | `keccak256(report)` | Hash of the opaque report payload |
//! | `context[0]` | Config digest the report was produced under |
//! | `context[1]` | Epoch and round of the reporting protocol |
//! | `context[2]` | Extra hash supplied by the reporting plugin |
//!
//! The signed digest is the Keccak-256 hash of those four words, in order.

use crate::{ConfigDigest, Hash};

/// Maximum signatures in one set; bounded by the bytes of the packed recovery word.
pub const MAX_SIGNATURES: usize = 32;

/// Execution context a report was produced for: three 32-byte words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportContext(pub [[u8; 32]; 3]);

impl ReportContext {
    /// Build a context from its three words.
    pub fn new(config_digest: ConfigDigest, epoch_and_round: [u8; 32], extra_hash: [u8; 32]) -> Self {
        Self([config_digest.0, epoch_and_round, extra_hash])
    }

    /// Config digest the report claims to be produced under.
    pub fn config_digest(&self) -> ConfigDigest {
        ConfigDigest(self.0[0])
    }

    /// Epoch and round word.
    pub fn epoch_and_round(&self) -> &[u8; 32] {
        &self.0[1]
    }

    /// Extra hash word.
    pub fn extra_hash(&self) -> &[u8; 32] {
        &self.0[2]
    }
}

/// Build the digest oracles sign for a report.
///
/// Used both when producing fixtures and when recovering signers, so the
/// layout lives in exactly one place.
pub fn report_digest(context: &ReportContext, report: &[u8]) -> Hash {
    let report_hash = Hash::from_bytes(report);
    Hash::from_parts(&[
        report_hash.as_bytes(),
        context.config_digest().as_bytes(),
        context.epoch_and_round(),
        context.extra_hash(),
    ])
}

/// Detached ECDSA signatures over one report digest.
///
/// Signature `i` is `(rs[i], ss[i])` with its recovery id in byte `i` of
/// `raw_vs`, counting from the most significant byte.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignatureSet {
    /// `r` components.
    pub rs: Vec<[u8; 32]>,
    /// `s` components.
    pub ss: Vec<[u8; 32]>,
    /// Packed recovery ids, one byte per signature.
    pub raw_vs: [u8; 32],
}

impl SignatureSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a signature. Returns false (and leaves the set unchanged) when full.
    pub fn push(&mut self, r: [u8; 32], s: [u8; 32], recovery_id: u8) -> bool {
        let index = self.rs.len();
        if index >= MAX_SIGNATURES {
            return false;
        }
        self.rs.push(r);
        self.ss.push(s);
        self.raw_vs[index] = recovery_id;
        true
    }

    /// Number of `r` components.
    pub fn len(&self) -> usize {
        self.rs.len()
    }

    /// Check if the set carries no signatures.
    pub fn is_empty(&self) -> bool {
        self.rs.is_empty()
    }

    /// Recovery id byte for signature `index`.
    pub fn recovery_byte(&self, index: usize) -> Option<u8> {
        self.raw_vs.get(index).copied()
    }

    /// 64-byte compact `r || s` encoding of signature `index`.
    pub fn compact(&self, index: usize) -> Option<[u8; 64]> {
        let r = self.rs.get(index)?;
        let s = self.ss.get(index)?;
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(r);
        out[32..].copy_from_slice(s);
        Some(out)
    }
}
