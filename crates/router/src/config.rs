//! Router configuration and declarative rotation plans.

use multilane_types::{Address, LaneConfigArgs, LaneId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration for a [`TransmissionRouter`](crate::TransmissionRouter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Chain id the router is deployed on.
    ///
    /// Transmissions are rejected once the host reports a different id.
    pub chain_id: u64,

    /// Initial owner. Must be non-zero.
    pub owner: Address,

    /// Lane selected at construction.
    pub initial_lane: LaneId,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            owner: Address::ZERO,
            initial_lane: LaneId::COMMIT,
        }
    }
}

impl RouterConfig {
    /// Create a config owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            ..Default::default()
        }
    }

    /// Set the chain id.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Set the initially selected lane.
    pub fn with_initial_lane(mut self, lane: LaneId) -> Self {
        self.initial_lane = lane;
        self
    }
}

/// Errors loading a rotation plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Failed to read plan: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML plan: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON plan: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rotation batch described as data.
///
/// In TOML each entry is a `[[lane]]` table:
///
/// ```toml
/// [[lane]]
/// lane = 0
/// config_digest = "0x01...01"
/// f = 1
/// signature_verification_enabled = true
/// signers = ["0x...", "0x..."]
/// transmitters = ["0x..."]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPlan {
    /// Entries, applied in order.
    #[serde(default, rename = "lane")]
    pub lanes: Vec<LaneConfigArgs>,
}

impl RotationPlan {
    /// Parse a TOML plan.
    pub fn from_toml_str(s: &str) -> Result<Self, PlanError> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a JSON plan.
    pub fn from_json_str(s: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a plan from disk; `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    /// Entries as a batch for [`rotate`](crate::TransmissionRouter::rotate).
    pub fn entries(&self) -> &[LaneConfigArgs] {
        &self.lanes
    }
}
