//! Core types for multi-lane oracle report verification.
//!
//! Shared by the configuration store, the signature verifier and the
//! transmission router:
//!
//! - identifiers: [`LaneId`], [`OracleRole`], [`OracleRecord`]
//! - accounts and digests: [`Address`], [`ConfigDigest`], [`Hash`]
//! - configuration records: [`ConfigInfo`], [`LaneConfig`], [`LaneConfigArgs`]
//! - signed reports: [`ReportContext`], [`SignatureSet`], [`report_digest`]
//! - signer recovery and duplicate tracking: [`SignerRecovery`], [`SignerBitfield`]

mod address;
mod config;
mod crypto;
mod error_kind;
mod hash;
mod identifiers;
mod notification;
mod signer_bitfield;
mod signing;

pub use address::Address;
pub use config::{ConfigInfo, LaneConfig, LaneConfigArgs, MAX_NUM_ORACLES};
pub use crypto::{SignatureError, SignerRecovery};
pub use error_kind::ErrorKind;
pub use hash::{ConfigDigest, Hash, HexError};
pub use identifiers::{LaneId, OracleRecord, OracleRole};
pub use notification::Notification;
pub use signer_bitfield::SignerBitfield;
pub use signing::{report_digest, ReportContext, SignatureSet, MAX_SIGNATURES};

// Re-exported so downstream crates and fixtures use the same curve library.
pub use secp256k1;
