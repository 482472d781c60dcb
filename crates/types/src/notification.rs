//! Notifications emitted by the engine.

use crate::{Address, ConfigDigest, LaneId};

/// Observable engine events.
///
/// Mutating operations return the notifications they produced; the host
/// decides how to publish them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    // ═══════════════════════════════════════════════════════════════════════
    // Configuration
    // ═══════════════════════════════════════════════════════════════════════
    /// A lane's configuration was replaced.
    ConfigSet {
        lane: LaneId,
        config_digest: ConfigDigest,
        signers: Vec<Address>,
        transmitters: Vec<Address>,
        f: u8,
    },

    /// A rotation batch committed.
    ConfigBatchApplied { lanes: Vec<LaneId> },

    // ═══════════════════════════════════════════════════════════════════════
    // Transmission
    // ═══════════════════════════════════════════════════════════════════════
    /// A signed report was accepted.
    Transmitted {
        lane: LaneId,
        config_digest: ConfigDigest,
        sequence_number: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Ownership
    // ═══════════════════════════════════════════════════════════════════════
    /// The owner proposed a successor.
    OwnershipTransferRequested { from: Address, to: Address },

    /// The proposed successor accepted ownership.
    OwnershipTransferred { from: Address, to: Address },
}

impl Notification {
    /// Get a human-readable name for this notification.
    pub fn type_name(&self) -> &'static str {
        match self {
            Notification::ConfigSet { .. } => "ConfigSet",
            Notification::ConfigBatchApplied { .. } => "ConfigBatchApplied",
            Notification::Transmitted { .. } => "Transmitted",
            Notification::OwnershipTransferRequested { .. } => "OwnershipTransferRequested",
            Notification::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}
