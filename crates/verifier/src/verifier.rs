//! Quorum verification against a configuration snapshot.

use crate::QuorumError;
use multilane_config::StoreSnapshot;
use multilane_types::{
    report_digest, LaneId, ReportContext, SignatureSet, SignerBitfield, SignerRecovery,
};
use tracing::{debug, trace};

/// Verifies signed reports against a lane's signer roster.
#[derive(Debug, Default)]
pub struct SignatureVerifier {
    recovery: SignerRecovery,
}

impl SignatureVerifier {
    /// Create a verifier with its own curve context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `signatures` form a quorum for `report` on `lane`.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - Configuration the submission is judged against
    /// * `lane` - Lane the report was submitted to
    /// * `context` - Report context the oracles signed over
    /// * `report` - Opaque report payload
    /// * `signatures` - Detached signatures, exactly `f + 1` of them
    ///
    /// Fails on the first offending signature.
    pub fn verify(
        &self,
        snapshot: &StoreSnapshot,
        lane: LaneId,
        context: &ReportContext,
        report: &[u8],
        signatures: &SignatureSet,
    ) -> Result<(), QuorumError> {
        if signatures.rs.len() != signatures.ss.len() {
            return Err(QuorumError::SignaturesOutOfRegistration);
        }

        let state = snapshot.lane(lane);
        let expected = state.map_or(1, |state| state.config().quorum());
        if signatures.rs.len() != expected {
            return Err(QuorumError::WrongNumberOfSignatures {
                expected,
                actual: signatures.rs.len(),
            });
        }

        let digest = report_digest(context, report);
        let roster_size = state.map_or(0, |state| state.config().signers.len());
        let mut seen = SignerBitfield::new(roster_size);

        for index in 0..signatures.len() {
            let (Some(compact), Some(recovery_byte)) =
                (signatures.compact(index), signatures.recovery_byte(index))
            else {
                return Err(QuorumError::InvalidSignature { index });
            };
            let signer = self
                .recovery
                .recover(&digest, &compact, recovery_byte)
                .map_err(|e| {
                    debug!(lane = lane.get(), index, error = %e, "Signature recovery failed");
                    QuorumError::InvalidSignature { index }
                })?;

            let Some(signer_index) = state.and_then(|state| state.signer_index(&signer)) else {
                return Err(QuorumError::UnauthorizedSigner { signer });
            };
            if !seen.insert(signer_index as usize) {
                return Err(QuorumError::NonUniqueSignatures { signer });
            }
            trace!(lane = lane.get(), index, signer_index, "Signature accepted");
        }

        debug!(lane = lane.get(), signatures = seen.count(), "Quorum verified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multilane_config::ConfigStore;
    use multilane_test_helpers::{oracle_keys, sign_report, signed_lane, test_context, OracleKey};
    use multilane_types::{ConfigDigest, ErrorKind};
    use tracing_test::traced_test;

    const DIGEST: ConfigDigest = ConfigDigest([0x42; 32]);

    /// Lane 0 with four signers, f = 1.
    fn setup() -> (ConfigStore, Vec<OracleKey>) {
        let signers = oracle_keys(1, 4);
        let transmitters = oracle_keys(50, 1);
        let store = ConfigStore::new();
        store
            .rotate(&[signed_lane(LaneId(0), DIGEST, 1, &signers, &transmitters)])
            .unwrap();
        (store, signers)
    }

    fn verify(
        store: &ConfigStore,
        signatures: &SignatureSet,
        report: &[u8],
    ) -> Result<(), QuorumError> {
        SignatureVerifier::new().verify(
            &store.snapshot(),
            LaneId(0),
            &test_context(DIGEST),
            report,
            signatures,
        )
    }

    #[traced_test]
    #[test]
    fn test_quorum_accepted() {
        let (store, signers) = setup();
        let signatures = sign_report(&signers[1..3], &test_context(DIGEST), b"report");
        assert_eq!(verify(&store, &signatures, b"report"), Ok(()));
        assert!(logs_contain("Quorum verified"));
    }

    #[test]
    fn test_exact_signature_count() {
        let (store, signers) = setup();
        let context = test_context(DIGEST);

        let one = sign_report(&signers[..1], &context, b"report");
        assert_eq!(
            verify(&store, &one, b"report"),
            Err(QuorumError::WrongNumberOfSignatures {
                expected: 2,
                actual: 1
            })
        );

        let three = sign_report(&signers[..3], &context, b"report");
        assert_eq!(
            verify(&store, &three, b"report"),
            Err(QuorumError::WrongNumberOfSignatures {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_out_of_registration() {
        let (store, signers) = setup();
        let mut signatures = sign_report(&signers[..2], &test_context(DIGEST), b"report");
        signatures.ss.pop();
        assert_eq!(
            verify(&store, &signatures, b"report"),
            Err(QuorumError::SignaturesOutOfRegistration)
        );
    }

    #[test]
    fn test_duplicate_signer_rejected() {
        let (store, signers) = setup();
        let twice = [signers[2].clone(), signers[2].clone()];
        let signatures = sign_report(&twice, &test_context(DIGEST), b"report");
        assert_eq!(
            verify(&store, &signatures, b"report"),
            Err(QuorumError::NonUniqueSignatures {
                signer: signers[2].address()
            })
        );
    }

    #[test]
    fn test_outsider_signer_rejected() {
        let (store, signers) = setup();
        let outsider = OracleKey::from_seed(999);
        let keys = [signers[0].clone(), outsider.clone()];
        let signatures = sign_report(&keys, &test_context(DIGEST), b"report");

        let err = verify(&store, &signatures, b"report").unwrap_err();
        assert_eq!(
            err,
            QuorumError::UnauthorizedSigner {
                signer: outsider.address()
            }
        );
        assert_eq!(err.kind(), ErrorKind::Quorum);
    }

    #[test]
    fn test_tampered_report_recovers_strangers() {
        let (store, signers) = setup();
        let signatures = sign_report(&signers[..2], &test_context(DIGEST), b"report");

        // Recovery over another payload yields unrelated addresses.
        let err = verify(&store, &signatures, b"tampered").unwrap_err();
        assert!(matches!(err, QuorumError::UnauthorizedSigner { .. }));
    }

    #[traced_test]
    #[test]
    fn test_malformed_signature() {
        let (store, signers) = setup();
        let mut signatures = sign_report(&signers[..2], &test_context(DIGEST), b"report");
        signatures.rs[1] = [0u8; 32];
        signatures.ss[1] = [0u8; 32];

        let err = verify(&store, &signatures, b"report").unwrap_err();
        assert_eq!(err, QuorumError::InvalidSignature { index: 1 });
        assert_eq!(err.kind(), ErrorKind::Quorum);
        assert!(logs_contain("Signature recovery failed"));
    }

    #[test]
    fn test_unconfigured_lane_has_no_signers() {
        let store = ConfigStore::new();
        let key = OracleKey::from_seed(1);
        let signatures = sign_report(&[key.clone()], &test_context(DIGEST), b"report");
        assert_eq!(
            verify(&store, &signatures, b"report"),
            Err(QuorumError::UnauthorizedSigner {
                signer: key.address()
            })
        );
    }
}
