//! secp256k1 signer recovery.
//!
//! The engine never signs; it only recovers the address that produced a
//! recoverable ECDSA signature over a report digest.

use crate::{Address, Hash};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1, VerifyOnly};

/// Recovers signer addresses from compact recoverable signatures.
pub struct SignerRecovery {
    secp: Secp256k1<VerifyOnly>,
}

impl SignerRecovery {
    /// Create a verification-only context.
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::verification_only(),
        }
    }

    /// Recover the address that signed `digest`.
    ///
    /// `recovery_byte` accepts both the raw form (0, 1) and the
    /// Ethereum `v` form (27, 28).
    pub fn recover(
        &self,
        digest: &Hash,
        compact: &[u8; 64],
        recovery_byte: u8,
    ) -> Result<Address, SignatureError> {
        let raw = match recovery_byte {
            27 | 28 => recovery_byte - 27,
            other => other,
        };
        let recovery_id = RecoveryId::from_i32(raw as i32)
            .map_err(|_| SignatureError::InvalidRecoveryId(recovery_byte))?;
        let signature = RecoverableSignature::from_compact(compact, recovery_id)
            .map_err(|_| SignatureError::Malformed)?;
        let message = Message::from_digest(digest.to_bytes());
        let public_key = self
            .secp
            .recover_ecdsa(&message, &signature)
            .map_err(|_| SignatureError::RecoveryFailed)?;
        Ok(Address::from_public_key(&public_key))
    }
}

impl Default for SignerRecovery {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignerRecovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerRecovery").finish_non_exhaustive()
    }
}

/// Errors that can occur while recovering a signer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// Recovery byte does not map to a secp256k1 recovery id.
    #[error("Invalid recovery id byte {0}")]
    InvalidRecoveryId(u8),

    /// `r` or `s` is out of range.
    #[error("Malformed signature")]
    Malformed,

    /// No public key recovers from this signature.
    #[error("Signer recovery failed")]
    RecoveryFailed,
}
