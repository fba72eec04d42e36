//! # Memebank Market
//!
//! The accounting core of the Memebank AMM engine: one constant-product
//! pool per listed asset, paired against a single payment asset, with a
//! virtual payment-side reserve that sets the initial price without real
//! capital.
//!
//! Layering, leaves first:
//!
//! - [`ledger::ShareLedger`] is multi-asset fungible LP-share
//!   bookkeeping, independent of pool math.
//! - [`bank::AssetTransfer`] is the external token-movement capability
//!   the engine calls into ([`bank::InMemoryBank`] is the reference
//!   implementation used by tests).
//! - [`market::Market`] is the facade: init / add / remove / buy / sell
//!   plus read-only quotes, composing the curve math from `memebank-amm`.
//! - [`shared::SharedMarket`] is a mutex-guarded wrapper giving the
//!   serialized, non-reentrant execution model for shared use.
//!
//! Every mutating operation is all-or-nothing: validation and external
//! transfers happen before any internal state is touched, so a failure at
//! any point leaves the engine exactly as it was and emits no event.

pub mod bank;
pub mod config;
pub mod error;
pub mod ledger;
pub mod market;
pub mod pool;
pub mod shared;

pub use bank::{AssetTransfer, InMemoryBank, TransferAsset, TransferError};
pub use config::{ConfigError, MarketConfig};
pub use error::MarketError;
pub use ledger::{LedgerError, ShareLedger};
pub use market::{LiquidityAddedOutcome, LiquidityRemovedOutcome, Market};
pub use pool::Pool;
pub use shared::SharedMarket;
