//! Test helpers for multilane.
//!
//! Provides oracle keys and properly-signed report fixtures so tests across
//! the workspace exercise real secp256k1 recovery instead of mocks.

use multilane_types::secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use multilane_types::{
    report_digest, Address, ConfigDigest, Hash, LaneConfigArgs, LaneId, ReportContext,
    SignatureSet,
};
use rand::RngCore;

/// An oracle signing key and the address it controls.
#[derive(Clone)]
pub struct OracleKey {
    secret: SecretKey,
    address: Address,
}

impl OracleKey {
    /// Derive a deterministic key from a seed.
    ///
    /// The same seed always yields the same key and address.
    pub fn from_seed(seed: u64) -> Self {
        let mut material = Hash::from_bytes(&seed.to_be_bytes());
        loop {
            // Out-of-range scalars are astronomically rare; rehash and retry.
            if let Ok(secret) = SecretKey::from_slice(material.as_bytes()) {
                return Self::from_secret(secret);
            }
            material = Hash::from_bytes(material.as_bytes());
        }
    }

    /// Generate a random key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            if let Ok(secret) = SecretKey::from_slice(&bytes) {
                return Self::from_secret(secret);
            }
        }
    }

    fn from_secret(secret: SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let address = Address::from_public_key(&PublicKey::from_secret_key(&secp, &secret));
        Self { secret, address }
    }

    /// Address controlled by this key.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a digest, returning `(r, s, recovery_id)` with the raw recovery id (0 or 1).
    pub fn sign_digest(&self, digest: &Hash) -> ([u8; 32], [u8; 32], u8) {
        let secp = Secp256k1::signing_only();
        let message = Message::from_digest(digest.to_bytes());
        let (recovery_id, compact) = secp
            .sign_ecdsa_recoverable(&message, &self.secret)
            .serialize_compact();

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        (r, s, recovery_id.to_i32() as u8)
    }
}

impl std::fmt::Debug for OracleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleKey")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Generate `count` deterministic keys starting at `first_seed`.
pub fn oracle_keys(first_seed: u64, count: usize) -> Vec<OracleKey> {
    (0..count as u64)
        .map(|i| OracleKey::from_seed(first_seed + i))
        .collect()
}

/// Addresses of a set of keys, in order.
pub fn addresses(keys: &[OracleKey]) -> Vec<Address> {
    keys.iter().map(OracleKey::address).collect()
}

/// Sign a report with every key, in order.
///
/// Keys beyond the signature set capacity are silently dropped.
pub fn sign_report(keys: &[OracleKey], context: &ReportContext, report: &[u8]) -> SignatureSet {
    let digest = report_digest(context, report);
    let mut signatures = SignatureSet::new();
    for key in keys {
        let (r, s, v) = key.sign_digest(&digest);
        signatures.push(r, s, v);
    }
    signatures
}

/// Build a report context for `config_digest` with fixed round and extra words.
pub fn test_context(config_digest: ConfigDigest) -> ReportContext {
    let mut epoch_and_round = [0u8; 32];
    epoch_and_round[31] = 1;
    ReportContext::new(config_digest, epoch_and_round, [0u8; 32])
}

/// Build a rotation entry for a signature-verified lane.
pub fn signed_lane(
    lane: LaneId,
    config_digest: ConfigDigest,
    f: u8,
    signers: &[OracleKey],
    transmitters: &[OracleKey],
) -> LaneConfigArgs {
    LaneConfigArgs {
        lane,
        config_digest,
        f,
        signature_verification_enabled: true,
        signers: addresses(signers),
        transmitters: addresses(transmitters),
    }
}

/// Build a rotation entry for a lane without signature verification.
pub fn unsigned_lane(
    lane: LaneId,
    config_digest: ConfigDigest,
    f: u8,
    transmitters: &[OracleKey],
) -> LaneConfigArgs {
    LaneConfigArgs {
        lane,
        config_digest,
        f,
        signature_verification_enabled: false,
        signers: Vec::new(),
        transmitters: addresses(transmitters),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multilane_types::SignerRecovery;

    #[test]
    fn test_seeded_keys_are_deterministic() {
        assert_eq!(OracleKey::from_seed(7).address(), OracleKey::from_seed(7).address());
        assert_ne!(OracleKey::from_seed(7).address(), OracleKey::from_seed(8).address());
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(OracleKey::generate().address(), OracleKey::generate().address());
    }

    #[test]
    fn test_signed_report_recovers_signers() {
        let keys = oracle_keys(100, 3);
        let context = test_context(ConfigDigest([9u8; 32]));
        let signatures = sign_report(&keys, &context, b"report");
        assert_eq!(signatures.len(), 3);

        let recovery = SignerRecovery::new();
        let digest = report_digest(&context, b"report");
        for (i, key) in keys.iter().enumerate() {
            let compact = signatures.compact(i).unwrap();
            let v = signatures.recovery_byte(i).unwrap();
            assert_eq!(recovery.recover(&digest, &compact, v).unwrap(), key.address());
        }
    }
}
