//! Wire form of facade calls and the relay/market seam.
//!
//! A meta-transaction carries the intended market call as opaque bytes in
//! `ForwardRequest.data`. `MarketCall` is the typed form; bincode is the
//! wire encoding. The forwarder never interprets the payload; it hands
//! the bytes to a [`ForwardTarget`] together with the vouched-for sender.

use crate::ids::AssetId;
use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// One mutating market operation, as carried inside a forward request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketCall {
    InitPool {
        asset: AssetId,
        meme_in: U256,
        virtual_payment: U256,
        payment_in: U256,
    },
    AddLiquidity {
        asset: AssetId,
        meme_in: U256,
        min_payment: U256,
    },
    RemoveLiquidity {
        asset: AssetId,
        burn_amount: U256,
        min_meme_out: U256,
        min_payment_out: U256,
    },
    Buy {
        asset: AssetId,
        payment_in: U256,
        min_meme_out: U256,
    },
    Sell {
        asset: AssetId,
        meme_in: U256,
        min_payment_out: U256,
    },
}

/// Typed result of a dispatched market call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutcome {
    LiquidityAdded {
        payment_in: U256,
        shares_minted: U256,
    },
    LiquidityRemoved {
        meme_out: U256,
        payment_out: U256,
    },
    Bought {
        meme_out: U256,
    },
    Sold {
        payment_out: U256,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CallCodecError {
    #[error("failed to encode call: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode call payload: {0}")]
    Decode(#[source] bincode::Error),
}

impl MarketCall {
    /// Encode for use as `ForwardRequest.data`.
    pub fn encode(&self) -> Result<Vec<u8>, CallCodecError> {
        bincode::serialize(self).map_err(CallCodecError::Encode)
    }

    /// Decode a forward-request payload.
    pub fn decode(data: &[u8]) -> Result<Self, CallCodecError> {
        bincode::deserialize(data).map_err(CallCodecError::Decode)
    }
}

impl CallOutcome {
    pub fn encode(&self) -> Result<Vec<u8>, CallCodecError> {
        bincode::serialize(self).map_err(CallCodecError::Encode)
    }

    pub fn decode(data: &[u8]) -> Result<Self, CallCodecError> {
        bincode::deserialize(data).map_err(CallCodecError::Decode)
    }
}

/// A callable the forwarder can dispatch into.
///
/// Implementors decide how much to trust `forwarder`: an untrusted
/// forwarder's relayed sender must not be believed, in which case the
/// forwarder itself is the effective caller.
pub trait ForwardTarget {
    /// Address this target answers to; requests to other addresses must
    /// not be dispatched here.
    fn address(&self) -> Address;

    /// Execute the encoded call on behalf of `sender`, as vouched for by
    /// `forwarder`. Returns the encoded outcome, or an opaque error that
    /// the forwarder reports as a reverted call.
    fn forward_call(
        &mut self,
        forwarder: Address,
        sender: Address,
        value: U256,
        data: &[u8],
    ) -> anyhow::Result<Vec<u8>>;
}
