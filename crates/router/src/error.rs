//! Router error types.

use crate::{ForkedChain, OwnershipError};
use multilane_config::ConfigError;
use multilane_types::{Address, ConfigDigest, ErrorKind, LaneId};
use multilane_verifier::QuorumError;
use thiserror::Error;

/// Errors from [`rotate`](crate::TransmissionRouter::rotate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RotationError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RotationError::Ownership(e) => e.kind(),
            RotationError::Config(e) => e.kind(),
        }
    }
}

/// Reasons a transmission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransmitError {
    /// The host chain id changed since construction.
    #[error(transparent)]
    ForkedChain(#[from] ForkedChain),

    /// The signature set does not form a quorum.
    #[error(transparent)]
    Quorum(#[from] QuorumError),

    /// The report was produced under a different configuration.
    #[error("Config digest mismatch on {lane}: expected {expected}, actual {actual}")]
    ConfigDigestMismatch {
        lane: LaneId,
        expected: ConfigDigest,
        actual: ConfigDigest,
    },

    /// Caller is not a transmitter of the active lane.
    #[error("Unauthorized transmitter {caller} on {lane}")]
    UnauthorizedTransmitter { lane: LaneId, caller: Address },

    /// Signed submission to a lane without signature verification.
    #[error("Signature verification disabled on {lane}")]
    SignatureVerificationDisabled { lane: LaneId },

    /// Unsigned submission to a lane that requires a signature quorum.
    #[error("Signature verification required on {lane}")]
    SignatureVerificationRequired { lane: LaneId },
}

impl TransmitError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransmitError::ForkedChain(_) | TransmitError::ConfigDigestMismatch { .. } => {
                ErrorKind::Context
            }
            TransmitError::Quorum(e) => e.kind(),
            TransmitError::UnauthorizedTransmitter { .. } => ErrorKind::Authorization,
            TransmitError::SignatureVerificationDisabled { .. }
            | TransmitError::SignatureVerificationRequired { .. } => ErrorKind::Validation,
        }
    }
}
