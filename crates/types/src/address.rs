//! Oracle account addresses.

use crate::{Hash, HexError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account address.
///
/// Derived from a secp256k1 public key as the last 20 bytes of the
/// Keccak-256 hash of the uncompressed key (without the `0x04` tag).
/// The zero address is never a valid oracle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Derive the address controlled by a secp256k1 public key.
    pub fn from_public_key(key: &secp256k1::PublicKey) -> Self {
        let uncompressed = key.serialize_uncompressed();
        let hash = Hash::from_bytes(&uncompressed[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash.as_bytes()[12..]);
        Self(bytes)
    }

    /// Build an address with every byte set to `byte`.
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Parse an address from hex (optional `0x` prefix).
    pub fn from_hex(hex: &str) -> Result<Self, HexError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        if hex.len() != 40 {
            return Err(HexError::InvalidLength {
                expected: 40,
                actual: hex.len(),
            });
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex, &mut bytes).map_err(|_| HexError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// Convert to hex string (no prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get bytes as slice reference.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
