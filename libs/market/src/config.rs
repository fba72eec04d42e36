//! Market configuration.

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse market config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Static configuration of one market instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// The engine's own account: where pooled funds are held in the bank
    /// and which forward requests it answers to.
    pub address: Address,

    /// Forwarder whose relayed sender identity is believed. Requests
    /// arriving from any other forwarder are treated as direct calls from
    /// that forwarder's own address.
    #[serde(default)]
    pub trusted_forwarder: Option<Address>,
}

impl MarketConfig {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            trusted_forwarder: None,
        }
    }

    pub fn with_trusted_forwarder(mut self, forwarder: Address) -> Self {
        self.trusted_forwarder = Some(forwarder);
        self
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}
