//! Error types for configuration rotation.

use multilane_types::{ErrorKind, LaneId};
use thiserror::Error;

/// Reason a rotation entry was rejected as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidConfigKind {
    /// `f` was zero.
    #[error("f must be positive")]
    FMustBePositive,

    /// More transmitters than the roster cap.
    #[error("too many transmitters")]
    TooManyTransmitters,

    /// More signers than the roster cap.
    #[error("too many signers")]
    TooManySigners,

    /// `f` is not below the signer count, or `f + 1` signatures do not fit one set.
    #[error("f too high for the signer roster")]
    FTooHigh,

    /// The same address appears twice in one roster.
    #[error("repeated oracle address")]
    RepeatedOracleAddress,

    /// Empty transmitter roster.
    #[error("no transmitters")]
    NoTransmitters,

    /// Empty signer roster on a signature-verified lane.
    #[error("no signers")]
    NoSigners,
}

/// Errors that reject a whole rotation batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A roster or quorum parameter is malformed.
    #[error("Invalid config for {lane}: {kind}")]
    InvalidConfig {
        /// Lane of the offending entry.
        lane: LaneId,
        /// What was wrong with it.
        kind: InvalidConfigKind,
    },

    /// A roster contains the zero address.
    #[error("Oracle cannot be the zero address ({lane})")]
    OracleCannotBeZeroAddress {
        /// Lane of the offending entry.
        lane: LaneId,
    },

    /// The entry tries to flip the signature verification flag of a configured lane.
    #[error("Static config cannot be changed for {0}")]
    StaticConfigCannotBeChanged(LaneId),
}

impl ConfigError {
    /// Lane of the entry that rejected the batch.
    pub fn lane(&self) -> LaneId {
        match self {
            ConfigError::InvalidConfig { lane, .. }
            | ConfigError::OracleCannotBeZeroAddress { lane } => *lane,
            ConfigError::StaticConfigCannotBeChanged(lane) => *lane,
        }
    }

    /// Rotation errors are always validation failures.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
