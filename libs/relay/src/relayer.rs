//! Relayer submission policy.
//!
//! The relayer sits in front of the forwarder and decides which requests
//! are worth submitting at all. A request to a non-whitelisted target is
//! rejected before the forwarder is touched, so it burns no nonce.

use crate::error::RelayError;
use crate::forwarder::{Forwarder, RequestVerifier};
use crate::request::ForwardRequest;
use ethers_core::types::Address;
use memebank_types::ForwardTarget;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum RelayConfigError {
    #[error("failed to parse relay config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Static configuration for one forwarder deployment and its relayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Forwarder account the EIP-712 domain binds to.
    pub address: Address,
    pub chain_id: u64,
    /// Targets the relayer will forward to; `None` forwards to anything.
    #[serde(default)]
    pub whitelist: Option<Vec<Address>>,
}

impl RelayConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, RelayConfigError> {
        Ok(toml::from_str(raw)?)
    }
}

/// Whitelist-enforcing front end over a [`Forwarder`].
#[derive(Debug, Clone, Default)]
pub struct Relayer {
    whitelist: Option<HashSet<Address>>,
}

impl Relayer {
    /// Relayer that forwards to any target.
    pub fn open() -> Self {
        Self { whitelist: None }
    }

    pub fn with_whitelist(targets: impl IntoIterator<Item = Address>) -> Self {
        Self {
            whitelist: Some(targets.into_iter().collect()),
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        match &config.whitelist {
            Some(targets) => Self::with_whitelist(targets.iter().copied()),
            None => Self::open(),
        }
    }

    /// Whitelist check, then verify, then execute.
    pub fn relay<V: RequestVerifier>(
        &self,
        forwarder: &mut Forwarder<V>,
        request: &ForwardRequest,
        signature: &[u8],
        target: &mut dyn ForwardTarget,
    ) -> Result<Vec<u8>, RelayError> {
        if let Some(whitelist) = &self.whitelist {
            if !whitelist.contains(&request.to) {
                warn!(to = ?request.to, "refusing to relay to non-whitelisted target");
                return Err(RelayError::RejectedTarget(request.to));
            }
        }
        if !forwarder.verify(request, signature) {
            return Err(RelayError::InvalidSignatureOrNonce);
        }
        forwarder.execute(request, signature, target)
    }
}
