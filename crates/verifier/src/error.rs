//! Quorum verification errors.

use multilane_types::{Address, ErrorKind};
use thiserror::Error;

/// Reasons a signature set fails to form a quorum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuorumError {
    /// `rs` and `ss` have different lengths.
    #[error("Signature components out of registration")]
    SignaturesOutOfRegistration,

    /// The set does not carry exactly `f + 1` signatures.
    #[error("Wrong number of signatures: expected {expected}, got {actual}")]
    WrongNumberOfSignatures { expected: usize, actual: usize },

    /// Signature at `index` is malformed or recovers no key.
    #[error("Invalid signature at index {index}")]
    InvalidSignature { index: usize },

    /// A signature recovered to an address outside the signer roster.
    #[error("Unauthorized signer {signer}")]
    UnauthorizedSigner { signer: Address },

    /// Two signatures recovered to the same signer.
    #[error("Non-unique signatures from {signer}")]
    NonUniqueSignatures { signer: Address },
}

impl QuorumError {
    /// Every quorum failure, including an unrecognized signer, is a quorum rejection.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Quorum
    }
}
