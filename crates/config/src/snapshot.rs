//! Immutable view of every lane's configuration.

use multilane_types::{Address, LaneConfig, LaneId, OracleRecord, OracleRole};
use std::collections::HashMap;

/// Configuration and role indexes of one lane.
///
/// Signer and transmitter records live in separate maps so an address can
/// hold both roles with independent indices.
#[derive(Debug, Clone, Default)]
pub struct LaneState {
    pub(crate) config: LaneConfig,
    pub(crate) signers: HashMap<Address, u8>,
    pub(crate) transmitters: HashMap<Address, u8>,
}

impl LaneState {
    /// The lane's configuration.
    pub fn config(&self) -> &LaneConfig {
        &self.config
    }

    /// Signer index of `address`, if it signs for this lane.
    pub fn signer_index(&self, address: &Address) -> Option<u8> {
        self.signers.get(address).copied()
    }

    /// Transmitter index of `address`, if it transmits for this lane.
    pub fn transmitter_index(&self, address: &Address) -> Option<u8> {
        self.transmitters.get(address).copied()
    }
}

/// Point-in-time configuration of all lanes.
///
/// Snapshots are never mutated after publication. A caller that holds one
/// sees a single consistent configuration for every lane, regardless of
/// rotations committed afterwards.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub(crate) lanes: HashMap<LaneId, LaneState>,
}

impl StoreSnapshot {
    /// State of a configured lane.
    pub fn lane(&self, lane: LaneId) -> Option<&LaneState> {
        self.lanes.get(&lane)
    }

    /// Configuration of a lane; the zero value when the lane is unconfigured.
    pub fn describe(&self, lane: LaneId) -> LaneConfig {
        self.lanes
            .get(&lane)
            .map(|state| state.config.clone())
            .unwrap_or_default()
    }

    /// Role and index of `address` in `lane`.
    ///
    /// An address holding both roles reports its signer record; use
    /// [`lookup_role`](Self::lookup_role) to ask for a specific role.
    pub fn lookup_oracle(&self, lane: LaneId, address: &Address) -> OracleRecord {
        let signer = self.lookup_role(lane, address, OracleRole::Signer);
        if signer.is_set() {
            return signer;
        }
        self.lookup_role(lane, address, OracleRole::Transmitter)
    }

    /// Record of `address` for one specific role, or unset.
    pub fn lookup_role(&self, lane: LaneId, address: &Address, role: OracleRole) -> OracleRecord {
        let Some(state) = self.lanes.get(&lane) else {
            return OracleRecord::UNSET;
        };
        let index = match role {
            OracleRole::Signer => state.signer_index(address),
            OracleRole::Transmitter => state.transmitter_index(address),
            OracleRole::Unset => None,
        };
        index.map_or(OracleRecord::UNSET, |index| OracleRecord { index, role })
    }
}
