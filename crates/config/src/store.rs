//! Concurrent configuration store.

use crate::rotation::apply_batch;
use crate::{ConfigError, StoreSnapshot};
use arc_swap::ArcSwap;
use multilane_types::{
    Address, LaneConfig, LaneConfigArgs, LaneId, Notification, OracleRecord, OracleRole,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

/// Per-lane roster and quorum configuration.
///
/// Readers load the current [`StoreSnapshot`] without locking. Rotations are
/// serialized by a writer lock, staged on a private copy of the snapshot and
/// published with a single pointer swap, so a reader observes either the full
/// batch or none of it.
#[derive(Debug, Default)]
pub struct ConfigStore {
    current: ArcSwap<StoreSnapshot>,
    writer: Mutex<()>,
}

impl ConfigStore {
    /// Create an empty store with no configured lanes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    ///
    /// The returned snapshot stays valid, and unchanged, for as long as the
    /// caller holds it.
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.current.load_full()
    }

    /// Apply a rotation batch atomically.
    ///
    /// Every entry is validated in order; the first failure rejects the whole
    /// batch and leaves the published configuration untouched. On success
    /// returns one `ConfigSet` per entry followed by `ConfigBatchApplied`.
    pub fn rotate(&self, batch: &[LaneConfigArgs]) -> Result<Vec<Notification>, ConfigError> {
        let _guard = self.writer.lock();

        let mut working = StoreSnapshot::clone(&self.current.load());
        let notifications = match apply_batch(&mut working, batch) {
            Ok(notifications) => notifications,
            Err(e) => {
                warn!(lane = e.lane().get(), error = %e, "Rotation rejected");
                return Err(e);
            }
        };

        self.current.store(Arc::new(working));

        info!(entries = batch.len(), "Rotation applied");
        Ok(notifications)
    }

    /// Configuration of a lane; the zero value when unconfigured.
    pub fn describe(&self, lane: LaneId) -> LaneConfig {
        self.current.load().describe(lane)
    }

    /// Role and index of `address` in `lane`, preferring the signer record.
    pub fn lookup_oracle(&self, lane: LaneId, address: &Address) -> OracleRecord {
        self.current.load().lookup_oracle(lane, address)
    }

    /// Record of `address` for one specific role.
    pub fn lookup_role(&self, lane: LaneId, address: &Address, role: OracleRole) -> OracleRecord {
        self.current.load().lookup_role(lane, address, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InvalidConfigKind;
    use multilane_types::ConfigDigest;
    use tracing_test::traced_test;

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn entry(
        lane: u8,
        digest: u8,
        verify: bool,
        signers: &[u8],
        transmitters: &[u8],
    ) -> LaneConfigArgs {
        LaneConfigArgs {
            lane: LaneId(lane),
            config_digest: ConfigDigest([digest; 32]),
            f: 1,
            signature_verification_enabled: verify,
            signers: signers.iter().map(|&n| addr(n)).collect(),
            transmitters: transmitters.iter().map(|&n| addr(n)).collect(),
        }
    }

    #[traced_test]
    #[test]
    fn test_rotate_publishes_batch() {
        let store = ConfigStore::new();
        let notifications = store
            .rotate(&[
                entry(0, 0xA1, true, &[1, 2, 3], &[4, 5]),
                entry(1, 0xB1, false, &[], &[6]),
            ])
            .unwrap();
        assert_eq!(notifications.len(), 3);

        let commit = store.describe(LaneId::COMMIT);
        assert_eq!(commit.info.config_digest, ConfigDigest([0xA1; 32]));
        assert_eq!(commit.info.n, 3);
        assert_eq!(commit.signers, vec![addr(1), addr(2), addr(3)]);

        assert_eq!(
            store.lookup_oracle(LaneId::COMMIT, &addr(2)),
            OracleRecord::signer(1)
        );
        assert_eq!(
            store.lookup_oracle(LaneId::EXECUTION, &addr(6)),
            OracleRecord::transmitter(0)
        );
        assert!(logs_contain("Rotation applied"));
    }

    #[traced_test]
    #[test]
    fn test_failed_batch_changes_nothing() {
        let store = ConfigStore::new();
        store.rotate(&[entry(0, 0xA1, true, &[1, 2], &[3])]).unwrap();
        let before = store.snapshot();

        // The second entry is invalid, so the first must not land either.
        let err = store
            .rotate(&[
                entry(0, 0xA2, true, &[7, 8], &[9]),
                entry(1, 0xB1, true, &[1, 1], &[2]),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidConfig {
                lane: LaneId(1),
                kind: InvalidConfigKind::RepeatedOracleAddress
            }
        );

        assert_eq!(store.describe(LaneId(0)), before.describe(LaneId(0)));
        assert!(!store.describe(LaneId(1)).is_configured());
        assert_eq!(
            store.lookup_oracle(LaneId(0), &addr(1)),
            OracleRecord::signer(0)
        );
        assert_eq!(store.lookup_oracle(LaneId(0), &addr(7)), OracleRecord::UNSET);
        assert!(logs_contain("Rotation rejected"));
    }

    #[test]
    fn test_static_flag_is_pinned_by_first_rotation() {
        let store = ConfigStore::new();
        store.rotate(&[entry(2, 0x01, true, &[1, 2], &[3])]).unwrap();

        let err = store.rotate(&[entry(2, 0x02, false, &[], &[3])]).unwrap_err();
        assert_eq!(err, ConfigError::StaticConfigCannotBeChanged(LaneId(2)));
        assert!(store.describe(LaneId(2)).info.signature_verification_enabled);
    }

    #[test]
    fn test_rotation_replaces_roster() {
        let store = ConfigStore::new();
        store.rotate(&[entry(0, 0x01, true, &[1, 2], &[3])]).unwrap();
        store.rotate(&[entry(0, 0x02, true, &[4, 5], &[6])]).unwrap();

        for old in [1, 2, 3] {
            assert_eq!(store.lookup_oracle(LaneId(0), &addr(old)), OracleRecord::UNSET);
        }
        assert_eq!(
            store.lookup_oracle(LaneId(0), &addr(5)),
            OracleRecord::signer(1)
        );
    }

    #[test]
    fn test_dual_role_lookup() {
        let store = ConfigStore::new();
        store.rotate(&[entry(0, 0x01, true, &[1, 2, 3], &[3, 4])]).unwrap();

        assert_eq!(
            store.lookup_oracle(LaneId(0), &addr(3)),
            OracleRecord::signer(2)
        );
        assert_eq!(
            store.lookup_role(LaneId(0), &addr(3), OracleRole::Transmitter),
            OracleRecord::transmitter(0)
        );
        assert_eq!(
            store.lookup_role(LaneId(0), &addr(4), OracleRole::Signer),
            OracleRecord::UNSET
        );
    }

    #[test]
    fn test_held_snapshot_is_stable() {
        let store = ConfigStore::new();
        store.rotate(&[entry(0, 0x01, true, &[1, 2], &[3])]).unwrap();
        let held = store.snapshot();

        store.rotate(&[entry(0, 0x02, true, &[4, 5], &[6])]).unwrap();

        assert_eq!(
            held.describe(LaneId(0)).info.config_digest,
            ConfigDigest([0x01; 32])
        );
        assert_eq!(
            store.describe(LaneId(0)).info.config_digest,
            ConfigDigest([0x02; 32])
        );
    }

    #[test]
    fn test_concurrent_readers_see_whole_batches() {
        let store = Arc::new(ConfigStore::new());
        store
            .rotate(&[
                entry(0, 0x00, true, &[1, 2], &[3]),
                entry(1, 0x00, false, &[], &[4]),
            ])
            .unwrap();

        let reader = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..2_000 {
                    let snapshot = store.snapshot();
                    // Both lanes always carry the digest of the same batch.
                    assert_eq!(
                        snapshot.describe(LaneId(0)).info.config_digest,
                        snapshot.describe(LaneId(1)).info.config_digest
                    );
                }
            })
        };

        for round in 1..=200u8 {
            store
                .rotate(&[
                    entry(0, round, true, &[1, 2], &[3]),
                    entry(1, round, false, &[], &[4]),
                ])
                .unwrap();
        }
        reader.join().unwrap();
    }
}
