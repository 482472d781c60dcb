//! Per-lane configuration records.

use crate::{Address, ConfigDigest, LaneId};
use serde::{Deserialize, Serialize};

/// Maximum number of signers, and separately of transmitters, per lane.
pub const MAX_NUM_ORACLES: usize = 256;

/// Quorum parameters of the configuration currently active on a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigInfo {
    /// Digest of the active configuration.
    pub config_digest: ConfigDigest,
    /// Number of faulty signers the lane tolerates.
    pub f: u8,
    /// Signer roster size at the last rotation; up to [`MAX_NUM_ORACLES`].
    pub n: u16,
    /// Whether submissions must carry an `f + 1` signature quorum.
    ///
    /// Fixed by the first rotation of the lane.
    pub signature_verification_enabled: bool,
}

/// Full configuration of one lane.
///
/// The default value is what an unconfigured lane reports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaneConfig {
    /// Quorum parameters.
    pub info: ConfigInfo,
    /// Ordered signer roster; empty when signature verification is disabled.
    pub signers: Vec<Address>,
    /// Ordered transmitter roster.
    pub transmitters: Vec<Address>,
}

impl LaneConfig {
    /// Check if the lane has ever been configured.
    pub fn is_configured(&self) -> bool {
        self.info.f > 0
    }

    /// Number of signatures a signed submission must carry.
    pub fn quorum(&self) -> usize {
        self.info.f as usize + 1
    }
}

/// One entry of a rotation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneConfigArgs {
    /// Lane being configured.
    pub lane: LaneId,
    /// Digest of the new configuration.
    pub config_digest: ConfigDigest,
    /// Fault tolerance parameter.
    pub f: u8,
    /// Whether the lane enforces signature quorum.
    pub signature_verification_enabled: bool,
    /// Signer roster; ignored when signature verification is disabled.
    #[serde(default)]
    pub signers: Vec<Address>,
    /// Transmitter roster.
    pub transmitters: Vec<Address>,
}
