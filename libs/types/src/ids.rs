//! Asset identifiers.
//!
//! A pool is keyed by the traded token's address; the id is opaque to the
//! engine beyond equality and hashing.

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque key for one tradable asset's pool and LP-share class.
///
/// Derived from the asset's address, so the same token always maps to the
/// same pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub Address);

impl AssetId {
    /// Address this id was derived from.
    pub fn address(&self) -> Address {
        self.0
    }
}

impl From<Address> for AssetId {
    fn from(addr: Address) -> Self {
        AssetId(addr)
    }
}

impl From<[u8; 20]> for AssetId {
    fn from(raw: [u8; 20]) -> Self {
        AssetId(Address::from(raw))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
