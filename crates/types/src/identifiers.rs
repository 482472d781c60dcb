//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Plugin lane identifier.
///
/// Backed by a `u8`, so the engine can host at most 256 lanes and no
/// out-of-range lane can be constructed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LaneId(pub u8);

impl LaneId {
    /// Lane carrying commit reports.
    pub const COMMIT: Self = LaneId(0);

    /// Lane carrying execution reports.
    pub const EXECUTION: Self = LaneId(1);

    /// Get the raw value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lane({})", self.0)
    }
}

impl From<u8> for LaneId {
    fn from(value: u8) -> Self {
        LaneId(value)
    }
}

/// Role an oracle address holds within one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OracleRole {
    /// No role; the address is unknown to the lane.
    #[default]
    Unset,
    /// Signs reports.
    Signer,
    /// Submits reports.
    Transmitter,
}

impl fmt::Display for OracleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleRole::Unset => write!(f, "unset"),
            OracleRole::Signer => write!(f, "signer"),
            OracleRole::Transmitter => write!(f, "transmitter"),
        }
    }
}

/// Position of an oracle within its role's ordered roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OracleRecord {
    /// Index within the signer or transmitter list.
    pub index: u8,
    /// Role the index refers to.
    pub role: OracleRole,
}

impl OracleRecord {
    /// Record returned for unknown addresses.
    pub const UNSET: Self = OracleRecord {
        index: 0,
        role: OracleRole::Unset,
    };

    /// Create a signer record.
    pub fn signer(index: u8) -> Self {
        Self {
            index,
            role: OracleRole::Signer,
        }
    }

    /// Create a transmitter record.
    pub fn transmitter(index: u8) -> Self {
        Self {
            index,
            role: OracleRole::Transmitter,
        }
    }

    /// Check if the record carries a role.
    pub fn is_set(&self) -> bool {
        self.role != OracleRole::Unset
    }
}
