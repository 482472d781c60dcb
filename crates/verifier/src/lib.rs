//! Signature quorum verification.
//!
//! A signed report is accepted on a lane when it carries exactly `f + 1`
//! recoverable secp256k1 signatures over the report digest, each from a
//! distinct member of the lane's signer roster.
//!
//! The verifier is stateless apart from its curve context. It checks a
//! submission against the [`StoreSnapshot`](multilane_config::StoreSnapshot)
//! passed in and never touches the live store.

mod error;
mod verifier;

pub use error::QuorumError;
pub use verifier::SignatureVerifier;
