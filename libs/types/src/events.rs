//! Market events.
//!
//! The durable, externally observable record of every successful state
//! transition. Each mutating market call emits exactly one event on
//! success and none on failure.

use crate::ids::AssetId;
use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    LiquidityAdded {
        provider: Address,
        asset: AssetId,
        meme_in: U256,
        payment_in: U256,
        shares_minted: U256,
    },
    LiquidityRemoved {
        provider: Address,
        asset: AssetId,
        meme_out: U256,
        payment_out: U256,
        shares_burned: U256,
    },
    Buy {
        trader: Address,
        asset: AssetId,
        payment_in: U256,
        meme_out: U256,
    },
    Sell {
        trader: Address,
        asset: AssetId,
        payment_out: U256,
        meme_in: U256,
    },
}

impl MarketEvent {
    /// Asset the event concerns.
    pub fn asset(&self) -> AssetId {
        match *self {
            MarketEvent::LiquidityAdded { asset, .. }
            | MarketEvent::LiquidityRemoved { asset, .. }
            | MarketEvent::Buy { asset, .. }
            | MarketEvent::Sell { asset, .. } => asset,
        }
    }

    /// Account the event is attributed to.
    pub fn account(&self) -> Address {
        match *self {
            MarketEvent::LiquidityAdded { provider, .. }
            | MarketEvent::LiquidityRemoved { provider, .. } => provider,
            MarketEvent::Buy { trader, .. } | MarketEvent::Sell { trader, .. } => trader,
        }
    }
}
