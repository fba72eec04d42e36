//! Mutex-guarded market for shared use.
//!
//! The engine's execution model is a sequence of atomic, serialized
//! operations. A single lock around the whole market enforces that for
//! concurrent callers: one mutating operation at a time, no interleaving
//! and no reentrancy while an operation (including its external transfer
//! calls) is in flight.

use crate::bank::AssetTransfer;
use crate::error::MarketError;
use crate::market::{LiquidityAddedOutcome, LiquidityRemovedOutcome, Market};
use ethers_core::types::U256;
use memebank_types::{AssetId, Caller, MarketEvent};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SharedMarket<T> {
    inner: Arc<Mutex<Market<T>>>,
}

impl<T: AssetTransfer> SharedMarket<T> {
    pub fn new(market: Market<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(market)),
        }
    }

    /// Run `f` with exclusive access to the market.
    pub fn with<R>(&self, f: impl FnOnce(&mut Market<T>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn init_pool(
        &self,
        caller: Caller,
        asset: AssetId,
        meme_in: U256,
        virtual_payment: U256,
        payment_in: U256,
    ) -> Result<LiquidityAddedOutcome, MarketError> {
        self.with(|m| m.init_pool(caller, asset, meme_in, virtual_payment, payment_in))
    }

    pub fn add_liquidity(
        &self,
        caller: Caller,
        asset: AssetId,
        meme_in: U256,
        min_payment: U256,
    ) -> Result<LiquidityAddedOutcome, MarketError> {
        self.with(|m| m.add_liquidity(caller, asset, meme_in, min_payment))
    }

    pub fn remove_liquidity(
        &self,
        caller: Caller,
        asset: AssetId,
        burn_amount: U256,
        min_meme_out: U256,
        min_payment_out: U256,
    ) -> Result<LiquidityRemovedOutcome, MarketError> {
        self.with(|m| m.remove_liquidity(caller, asset, burn_amount, min_meme_out, min_payment_out))
    }

    pub fn buy(
        &self,
        caller: Caller,
        asset: AssetId,
        payment_in: U256,
        min_meme_out: U256,
    ) -> Result<U256, MarketError> {
        self.with(|m| m.buy(caller, asset, payment_in, min_meme_out))
    }

    pub fn sell(
        &self,
        caller: Caller,
        asset: AssetId,
        meme_in: U256,
        min_payment_out: U256,
    ) -> Result<U256, MarketError> {
        self.with(|m| m.sell(caller, asset, meme_in, min_payment_out))
    }

    pub fn drain_events(&self) -> Vec<MarketEvent> {
        self.with(|m| m.drain_events())
    }
}
