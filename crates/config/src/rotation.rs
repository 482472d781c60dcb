//! Validation and application of rotation batches.

use crate::{ConfigError, InvalidConfigKind, LaneState, StoreSnapshot};
use indexmap::IndexSet;
use multilane_types::{
    Address, ConfigInfo, LaneConfig, LaneConfigArgs, LaneId, Notification, MAX_NUM_ORACLES,
    MAX_SIGNATURES,
};
use std::collections::HashMap;
use tracing::debug;

/// Apply a batch to a working copy of the store.
///
/// Entries are applied in order, so a later entry for the same lane sees the
/// earlier one. On error the working copy is left half-written and must be
/// discarded by the caller.
pub(crate) fn apply_batch(
    working: &mut StoreSnapshot,
    batch: &[LaneConfigArgs],
) -> Result<Vec<Notification>, ConfigError> {
    let mut notifications = Vec::with_capacity(batch.len() + 1);
    let mut lanes = IndexSet::new();

    for args in batch {
        let previous = working.lanes.get(&args.lane).map(|state| &state.config);
        let state = build_lane_state(args, previous)?;

        debug!(
            lane = args.lane.get(),
            config_digest = %args.config_digest,
            f = args.f,
            n = state.config.info.n,
            transmitters = state.config.transmitters.len(),
            signature_verification_enabled = args.signature_verification_enabled,
            "Lane configuration staged"
        );

        notifications.push(Notification::ConfigSet {
            lane: args.lane,
            config_digest: args.config_digest,
            signers: state.config.signers.clone(),
            transmitters: state.config.transmitters.clone(),
            f: args.f,
        });
        lanes.insert(args.lane);

        // Replacing the entry drops every record of the previous roster.
        working.lanes.insert(args.lane, state);
    }

    notifications.push(Notification::ConfigBatchApplied {
        lanes: lanes.into_iter().collect(),
    });
    Ok(notifications)
}

/// Validate one entry against the lane's previous configuration and build its new state.
fn build_lane_state(
    args: &LaneConfigArgs,
    previous: Option<&LaneConfig>,
) -> Result<LaneState, ConfigError> {
    let lane = args.lane;
    let invalid = |kind| ConfigError::InvalidConfig { lane, kind };

    if args.f == 0 {
        return Err(invalid(InvalidConfigKind::FMustBePositive));
    }

    if let Some(previous) = previous.filter(|config| config.is_configured()) {
        if previous.info.signature_verification_enabled != args.signature_verification_enabled {
            return Err(ConfigError::StaticConfigCannotBeChanged(lane));
        }
    }

    if args.transmitters.len() > MAX_NUM_ORACLES {
        return Err(invalid(InvalidConfigKind::TooManyTransmitters));
    }
    if args.transmitters.is_empty() {
        return Err(invalid(InvalidConfigKind::NoTransmitters));
    }

    let signers: &[Address] = if args.signature_verification_enabled {
        if args.signers.len() > MAX_NUM_ORACLES {
            return Err(invalid(InvalidConfigKind::TooManySigners));
        }
        if args.signers.is_empty() {
            return Err(invalid(InvalidConfigKind::NoSigners));
        }
        let f = args.f as usize;
        if f >= args.signers.len() || f + 1 > MAX_SIGNATURES {
            return Err(invalid(InvalidConfigKind::FTooHigh));
        }
        &args.signers
    } else {
        // Quorum-free lanes never consult signers.
        &[]
    };

    let signer_index = index_roster(lane, signers)?;
    let transmitter_index = index_roster(lane, &args.transmitters)?;

    Ok(LaneState {
        config: LaneConfig {
            info: ConfigInfo {
                config_digest: args.config_digest,
                f: args.f,
                n: signers.len() as u16,
                signature_verification_enabled: args.signature_verification_enabled,
            },
            signers: signers.to_vec(),
            transmitters: args.transmitters.clone(),
        },
        signers: signer_index,
        transmitters: transmitter_index,
    })
}

/// Assign sequential indices to a roster, rejecting zero and repeated addresses.
fn index_roster(lane: LaneId, roster: &[Address]) -> Result<HashMap<Address, u8>, ConfigError> {
    let mut index = HashMap::with_capacity(roster.len());
    for (position, address) in roster.iter().enumerate() {
        if address.is_zero() {
            return Err(ConfigError::OracleCannotBeZeroAddress { lane });
        }
        // Rosters are capped at MAX_NUM_ORACLES, so every position fits a u8.
        if index.insert(*address, position as u8).is_some() {
            return Err(ConfigError::InvalidConfig {
                lane,
                kind: InvalidConfigKind::RepeatedOracleAddress,
            });
        }
    }
    Ok(index)
}
