//! Market error taxonomy.
//!
//! Every error aborts the whole operation with no partial state change and
//! no event. Errors from the transfer collaborator and the curve math are
//! surfaced verbatim.

use crate::bank::TransferError;
use crate::ledger::LedgerError;
use ethers_core::types::U256;
use memebank_amm::MathError;
use memebank_types::AssetId;

#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("pool already initialized for asset {0}")]
    PoolAlreadyInitialized(AssetId),

    #[error("pool not initialized for asset {0}")]
    PoolNotInitialized(AssetId),

    #[error("pool amounts must be greater than zero")]
    ZeroAmount,

    #[error("liquidity added is too small to require any payment")]
    InsufficientPaymentSupplied,

    #[error("payment required {required} is less than the caller minimum {minimum}")]
    PaymentBelowMinimum { required: U256, minimum: U256 },

    #[error("output {out} is less than the caller minimum {minimum}")]
    InsufficientOutput { out: U256, minimum: U256 },

    #[error("meme output {out} is less than the caller minimum {minimum}")]
    MemeOutputBelowMinimum { out: U256, minimum: U256 },

    #[error("payment output {out} is less than the caller minimum {minimum}")]
    PaymentOutputBelowMinimum { out: U256, minimum: U256 },

    #[error("market has insufficient liquidity for the trade")]
    InsufficientLiquidity,

    #[error("LP share balance {balance} is less than the requested burn {requested}")]
    InsufficientShareBalance { balance: U256, requested: U256 },

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Math(#[from] MathError),
}
