//! # Memebank Shared Types
//!
//! Common vocabulary for the Memebank AMM engine: asset identifiers, the
//! direct/relayed caller model, market events, and the bincode wire form of
//! facade calls used by the meta-transaction relay.
//!
//! All monetary amounts are `U256` and all identities are 160-bit `Address`
//! values, matching the EVM-shaped world the engine accounts for. No
//! floating point anywhere; arithmetic on these types is the business of
//! the `memebank-amm` and `memebank-market` crates.

pub mod caller;
pub mod calls;
pub mod events;
pub mod ids;

pub use caller::Caller;
pub use calls::{CallCodecError, CallOutcome, ForwardTarget, MarketCall};
pub use events::MarketEvent;
pub use ids::AssetId;

/// Re-exported EVM-width numeric and identity types.
pub use ethers_core::types::{Address, H256, U256};
