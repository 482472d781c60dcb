//! The transmission router.

use crate::{
    ChainContext, Ownership, OwnershipError, ReplayGuard, ReportHandler, RotationError,
    RouterConfig, TransmitError,
};
use multilane_config::{ConfigStore, StoreSnapshot};
use multilane_types::{
    Address, ConfigDigest, LaneConfig, LaneConfigArgs, LaneId, Notification, OracleRecord,
    OracleRole, ReportContext, SignatureSet,
};
use multilane_verifier::SignatureVerifier;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Version string reported by [`TransmissionRouter::type_and_version`].
pub const TYPE_AND_VERSION: &str = "MultiLaneVerifier 1.0.0";

/// Single entry point for report submission.
///
/// Owns the configuration store and routes every submission to the active
/// lane, applying either transmitter authorization (unsigned path) or
/// signature quorum verification (signed path).
///
/// All operations take `&self`; share the router behind an `Arc`.
///
/// # Locking
///
/// The active-lane selector is an `RwLock`. Rotation and lane selection hold
/// its write guard; transmissions hold its read guard while resolving the lane
/// and loading the store snapshot, and signed transmissions keep it until their
/// sequence number is assigned. A transmission therefore sees the selector and
/// every lane's configuration from one side of any concurrent mutation, and a
/// rotation never prunes a counter that an in-flight transmission still uses.
pub struct TransmissionRouter {
    store: ConfigStore,
    verifier: SignatureVerifier,
    replay: ReplayGuard,
    chain: Arc<dyn ChainContext>,
    ownership: Ownership,
    active_lane: RwLock<LaneId>,
    /// Next sequence number per (lane, config digest). Only active digests are kept.
    sequences: Mutex<HashMap<(LaneId, ConfigDigest), u64>>,
    handler: Arc<dyn ReportHandler>,
}

impl std::fmt::Debug for TransmissionRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransmissionRouter")
            .field("chain_id", &self.replay.expected())
            .field("ownership", &self.ownership)
            .field("active_lane", &*self.active_lane.read())
            .finish_non_exhaustive()
    }
}

impl TransmissionRouter {
    /// Create a router.
    ///
    /// # Arguments
    ///
    /// * `config` - Owner, deployment chain id and initial lane
    /// * `chain` - Source of the current chain id, consulted on every transmission
    /// * `handler` - Receives accepted reports and rotation callbacks
    ///
    /// Fails with `OwnerCannotBeZero` when `config.owner` is the zero address.
    pub fn new(
        config: RouterConfig,
        chain: Arc<dyn ChainContext>,
        handler: Arc<dyn ReportHandler>,
    ) -> Result<Self, OwnershipError> {
        let ownership = Ownership::new(config.owner)?;
        info!(
            chain_id = config.chain_id,
            owner = %config.owner,
            initial_lane = config.initial_lane.get(),
            "Transmission router created"
        );
        Ok(Self {
            store: ConfigStore::new(),
            verifier: SignatureVerifier::new(),
            replay: ReplayGuard::new(config.chain_id),
            chain,
            ownership,
            active_lane: RwLock::new(config.initial_lane),
            sequences: Mutex::new(HashMap::new()),
            handler,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Configuration
    // ═══════════════════════════════════════════════════════════════════════

    /// Apply a rotation batch. Owner only.
    ///
    /// The batch commits atomically or not at all. After a commit the handler's
    /// `after_config_set` runs once per affected lane.
    pub fn rotate(
        &self,
        caller: &Address,
        batch: &[LaneConfigArgs],
    ) -> Result<Vec<Notification>, RotationError> {
        self.ownership.require_owner(caller)?;

        let notifications = {
            let _selector = self.active_lane.write();
            let notifications = self.store.rotate(batch)?;
            self.prune_sequences();
            notifications
        };

        for notification in &notifications {
            if let Notification::ConfigBatchApplied { lanes } = notification {
                for lane in lanes {
                    self.handler.after_config_set(*lane);
                }
            }
        }
        Ok(notifications)
    }

    /// Configuration of a lane; the zero value when unconfigured.
    pub fn describe(&self, lane: LaneId) -> LaneConfig {
        self.store.describe(lane)
    }

    /// Role and index of `address` in `lane`, preferring the signer record.
    pub fn lookup_oracle(&self, lane: LaneId, address: &Address) -> OracleRecord {
        self.store.lookup_oracle(lane, address)
    }

    /// Record of `address` for one specific role in `lane`.
    pub fn lookup_role(&self, lane: LaneId, address: &Address, role: OracleRole) -> OracleRecord {
        self.store.lookup_role(lane, address, role)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lane selection
    // ═══════════════════════════════════════════════════════════════════════

    /// Select the lane later submissions are routed to. Owner only; idempotent.
    pub fn select_lane(&self, caller: &Address, lane: LaneId) -> Result<(), OwnershipError> {
        self.ownership.require_owner(caller)?;
        let mut selector = self.active_lane.write();
        if *selector != lane {
            info!(from = selector.get(), to = lane.get(), "Active lane selected");
            *selector = lane;
        }
        Ok(())
    }

    /// Lane submissions are currently routed to.
    pub fn active_lane(&self) -> LaneId {
        *self.active_lane.read()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Transmission
    // ═══════════════════════════════════════════════════════════════════════

    /// Submit a report carrying an `f + 1` signature quorum.
    ///
    /// Anyone may submit; authority comes from the signatures. On success the
    /// report is forwarded downstream with the next sequence number of its
    /// `(lane, config digest)` pair and a `Transmitted` notification is returned.
    pub fn transmit_signed(
        &self,
        context: &ReportContext,
        report: &[u8],
        signatures: &SignatureSet,
    ) -> Result<Vec<Notification>, TransmitError> {
        let (lane, sequence_number) = self
            .accept_signed(context, report, signatures)
            .inspect_err(|e| {
                warn!(error = %e, kind = %e.kind(), "Signed transmission rejected");
            })?;

        debug!(
            lane = lane.get(),
            config_digest = %context.config_digest(),
            sequence_number,
            "Signed report transmitted"
        );
        self.handler
            .handle_report(lane, context, report, Some(sequence_number));

        Ok(vec![Notification::Transmitted {
            lane,
            config_digest: context.config_digest(),
            sequence_number,
        }])
    }

    /// Submit a report on a lane without signature verification.
    ///
    /// `caller` must be a transmitter of the active lane. The report is
    /// forwarded downstream without a sequence number and no notification is
    /// produced.
    pub fn transmit_unsigned(
        &self,
        caller: &Address,
        context: &ReportContext,
        report: &[u8],
    ) -> Result<(), TransmitError> {
        let lane = self.accept_unsigned(caller, context).inspect_err(|e| {
            warn!(error = %e, kind = %e.kind(), "Unsigned transmission rejected");
        })?;

        debug!(lane = lane.get(), caller = %caller, "Unsigned report transmitted");
        self.handler.handle_report(lane, context, report, None);
        Ok(())
    }

    fn accept_signed(
        &self,
        context: &ReportContext,
        report: &[u8],
        signatures: &SignatureSet,
    ) -> Result<(LaneId, u64), TransmitError> {
        self.replay.assert_live_context(self.chain.chain_id())?;

        let selector = self.active_lane.read();
        let lane = *selector;
        let snapshot = self.store.snapshot();
        let config = snapshot.describe(lane);
        if !config.info.signature_verification_enabled {
            return Err(TransmitError::SignatureVerificationDisabled { lane });
        }
        check_digest(lane, &config, context)?;

        self.verifier
            .verify(&snapshot, lane, context, report, signatures)?;

        Ok((lane, self.next_sequence(lane, config.info.config_digest)))
    }

    fn accept_unsigned(
        &self,
        caller: &Address,
        context: &ReportContext,
    ) -> Result<LaneId, TransmitError> {
        self.replay.assert_live_context(self.chain.chain_id())?;

        let (lane, snapshot) = self.resolve();
        let config = snapshot.describe(lane);
        if config.info.signature_verification_enabled {
            return Err(TransmitError::SignatureVerificationRequired { lane });
        }
        check_digest(lane, &config, context)?;

        if !snapshot
            .lookup_role(lane, caller, OracleRole::Transmitter)
            .is_set()
        {
            return Err(TransmitError::UnauthorizedTransmitter {
                lane,
                caller: *caller,
            });
        }
        Ok(lane)
    }

    /// Active lane and the configuration snapshot, read under one selector guard.
    fn resolve(&self) -> (LaneId, Arc<StoreSnapshot>) {
        let selector = self.active_lane.read();
        (*selector, self.store.snapshot())
    }

    fn next_sequence(&self, lane: LaneId, config_digest: ConfigDigest) -> u64 {
        let mut sequences = self.sequences.lock();
        let next = sequences.entry((lane, config_digest)).or_insert(0);
        *next += 1;
        *next
    }

    /// Drop counters whose digest is no longer the lane's current one.
    ///
    /// Caller holds the selector write guard.
    fn prune_sequences(&self) {
        let snapshot = self.store.snapshot();
        let mut sequences = self.sequences.lock();
        let before = sequences.len();
        sequences.retain(|(lane, digest), _| {
            snapshot
                .lane(*lane)
                .is_some_and(|state| state.config().info.config_digest == *digest)
        });
        if sequences.len() < before {
            debug!(
                pruned = before - sequences.len(),
                "Sequence counters of replaced digests dropped"
            );
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Ownership
    // ═══════════════════════════════════════════════════════════════════════

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    /// Proposed next owner, if a transfer is pending.
    pub fn pending_owner(&self) -> Option<Address> {
        self.ownership.pending_owner()
    }

    /// Propose a new owner. Owner only.
    pub fn transfer_ownership(
        &self,
        caller: &Address,
        to: Address,
    ) -> Result<Vec<Notification>, OwnershipError> {
        Ok(vec![self.ownership.transfer(caller, to)?])
    }

    /// Accept a pending ownership transfer.
    pub fn accept_ownership(&self, caller: &Address) -> Result<Vec<Notification>, OwnershipError> {
        Ok(vec![self.ownership.accept(caller)?])
    }

    /// Component identifier and version.
    pub fn type_and_version(&self) -> &'static str {
        TYPE_AND_VERSION
    }
}

fn check_digest(
    lane: LaneId,
    config: &LaneConfig,
    context: &ReportContext,
) -> Result<(), TransmitError> {
    let expected = config.info.config_digest;
    let actual = context.config_digest();
    if actual != expected {
        return Err(TransmitError::ConfigDigestMismatch {
            lane,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LocalChain, NoopHandler, RecordingHandler};
    use multilane_test_helpers::{
        oracle_keys, sign_report, signed_lane, test_context, unsigned_lane,
    };
    use tracing_test::traced_test;

    const OWNER: Address = Address::repeat_byte(0xEE);
    const SIGNED: ConfigDigest = ConfigDigest([0x0A; 32]);
    const UNSIGNED: ConfigDigest = ConfigDigest([0x0B; 32]);

    fn router(handler: Arc<dyn ReportHandler>) -> TransmissionRouter {
        TransmissionRouter::new(
            RouterConfig::new(OWNER),
            Arc::new(LocalChain::new(1)),
            handler,
        )
        .unwrap()
    }

    #[test]
    fn test_zero_owner_rejected() {
        let err = TransmissionRouter::new(
            RouterConfig::default(),
            Arc::new(LocalChain::new(1)),
            Arc::new(NoopHandler),
        )
        .unwrap_err();
        assert_eq!(err, OwnershipError::OwnerCannotBeZero);
    }

    #[test]
    fn test_type_and_version() {
        assert_eq!(
            router(Arc::new(NoopHandler)).type_and_version(),
            "MultiLaneVerifier 1.0.0"
        );
    }

    #[test]
    fn test_rotation_notifies_handler_per_lane() {
        let handler = Arc::new(RecordingHandler::new());
        let router = router(handler.clone());
        let keys = oracle_keys(1, 3);

        router
            .rotate(
                &OWNER,
                &[
                    signed_lane(LaneId(1), SIGNED, 1, &keys, &keys[..1]),
                    unsigned_lane(LaneId(0), UNSIGNED, 1, &keys[..1]),
                    signed_lane(LaneId(1), SIGNED, 1, &keys, &keys[..1]),
                ],
            )
            .unwrap();
        assert_eq!(handler.configured_lanes(), vec![LaneId(1), LaneId(0)]);
    }

    #[test]
    fn test_non_owner_cannot_rotate_or_select() {
        let router = router(Arc::new(NoopHandler));
        let stranger = Address::repeat_byte(0x11);
        let keys = oracle_keys(1, 2);

        let err = router
            .rotate(&stranger, &[unsigned_lane(LaneId(0), UNSIGNED, 1, &keys)])
            .unwrap_err();
        assert_eq!(
            err,
            RotationError::Ownership(OwnershipError::OnlyCallableByOwner { caller: stranger })
        );
        assert!(!router.describe(LaneId(0)).is_configured());

        assert!(router.select_lane(&stranger, LaneId(3)).is_err());
        assert_eq!(router.active_lane(), LaneId::COMMIT);
    }

    #[traced_test]
    #[test]
    fn test_select_lane_is_idempotent() {
        let router = router(Arc::new(NoopHandler));
        router.select_lane(&OWNER, LaneId(4)).unwrap();
        router.select_lane(&OWNER, LaneId(4)).unwrap();
        assert_eq!(router.active_lane(), LaneId(4));
        assert!(logs_contain("Active lane selected"));
    }

    #[test]
    fn test_sequence_numbers_per_digest() {
        let router = router(Arc::new(NoopHandler));
        assert_eq!(router.next_sequence(LaneId(0), SIGNED), 1);
        assert_eq!(router.next_sequence(LaneId(0), SIGNED), 2);
        assert_eq!(router.next_sequence(LaneId(0), UNSIGNED), 1);
        assert_eq!(router.next_sequence(LaneId(1), SIGNED), 1);
    }

    #[test]
    fn test_rotation_drops_counters_of_replaced_digests() {
        let router = router(Arc::new(NoopHandler));
        let signers = oracle_keys(1, 3);
        let next = ConfigDigest([0x0C; 32]);
        router
            .rotate(&OWNER, &[signed_lane(LaneId(0), SIGNED, 1, &signers, &signers[..1])])
            .unwrap();

        let context = test_context(SIGNED);
        for _ in 0..2 {
            let signatures = sign_report(&signers[..2], &context, b"report");
            router.transmit_signed(&context, b"report", &signatures).unwrap();
        }
        assert_eq!(router.sequences.lock().get(&(LaneId(0), SIGNED)), Some(&2));

        // Re-rotating to the same digest keeps the counter.
        router
            .rotate(&OWNER, &[signed_lane(LaneId(0), SIGNED, 1, &signers, &signers[..1])])
            .unwrap();
        assert_eq!(router.sequences.lock().len(), 1);

        router
            .rotate(&OWNER, &[signed_lane(LaneId(0), next, 1, &signers, &signers[..1])])
            .unwrap();
        assert!(router.sequences.lock().is_empty());

        let context = test_context(next);
        let signatures = sign_report(&signers[1..], &context, b"report");
        assert_eq!(
            router.transmit_signed(&context, b"report", &signatures).unwrap(),
            vec![Notification::Transmitted {
                lane: LaneId(0),
                config_digest: next,
                sequence_number: 1
            }]
        );
    }

    #[test]
    fn test_debug_reports_guarded_chain() {
        let router = router(Arc::new(NoopHandler));
        assert!(format!("{router:?}").contains("chain_id: 1"));
    }

    #[traced_test]
    #[test]
    fn test_signed_transmission_delivers_report() {
        let handler = Arc::new(RecordingHandler::new());
        let router = router(handler.clone());
        let signers = oracle_keys(1, 4);
        router
            .rotate(
                &OWNER,
                &[signed_lane(LaneId(0), SIGNED, 1, &signers, &signers[..1])],
            )
            .unwrap();

        let context = test_context(SIGNED);
        let signatures = sign_report(&signers[2..], &context, b"report");
        let notifications = router
            .transmit_signed(&context, b"report", &signatures)
            .unwrap();

        assert_eq!(
            notifications,
            vec![Notification::Transmitted {
                lane: LaneId(0),
                config_digest: SIGNED,
                sequence_number: 1
            }]
        );
        let delivered = handler.reports();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].sequence_number, Some(1));
        assert_eq!(delivered[0].report, b"report".to_vec());
        assert!(logs_contain("Signed report transmitted"));
    }

    #[traced_test]
    #[test]
    fn test_rejected_transmission_is_logged() {
        let router = router(Arc::new(NoopHandler));
        let err = router
            .transmit_signed(&test_context(SIGNED), b"report", &SignatureSet::new())
            .unwrap_err();
        assert_eq!(
            err,
            TransmitError::SignatureVerificationDisabled { lane: LaneId(0) }
        );
        assert!(logs_contain("Signed transmission rejected"));
    }
}
