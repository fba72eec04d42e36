//! Effective-caller resolution.
//!
//! Every mutating market operation resolves who it is acting for exactly
//! once at entry and carries that identity through token transfers, share
//! accounting and event attribution. A call arrives either directly from
//! an account or through a trusted forwarder that vouches for the original
//! signer.

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};

/// The resolved identity a market operation acts on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Caller {
    /// The account invoked the market itself.
    Direct(Address),
    /// A trusted forwarder relayed a signed request; `sender` is the
    /// signer, `relayer` the forwarder that vouched for it.
    Relayed { relayer: Address, sender: Address },
}

impl Caller {
    /// The account all transfers, shares and events are attributed to.
    pub fn sender(&self) -> Address {
        match *self {
            Caller::Direct(sender) => sender,
            Caller::Relayed { sender, .. } => sender,
        }
    }

    /// Whether this call came through a forwarder.
    pub fn is_relayed(&self) -> bool {
        matches!(self, Caller::Relayed { .. })
    }
}
