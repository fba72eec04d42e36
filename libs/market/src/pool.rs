//! Per-asset pool state.

use ethers_core::types::U256;
use memebank_amm::MathError;
use serde::{Deserialize, Serialize};

/// Reserves of one asset's pool.
///
/// A `Pool` value exists in the market's keyed store only once `init_pool`
/// has succeeded, so existence encodes the initialized flag. Both
/// `meme_reserve` and the total payment reserve are positive at init and
/// the curve math never lets a trade drain either side to zero; only a
/// full liquidity exit can bring the real reserves back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Traded asset held by the engine for this pool.
    pub meme_reserve: U256,
    /// Real payment asset held for this pool.
    pub payment_reserve: U256,
    /// Phantom payment balance fixed at init time; never changes and is
    /// never paid out.
    pub virtual_payment_reserve: U256,
}

impl Pool {
    /// The effective payment side of the curve: real plus virtual.
    pub fn total_payment_reserve(&self) -> Result<U256, MathError> {
        self.payment_reserve
            .checked_add(self.virtual_payment_reserve)
            .ok_or(MathError::Overflow)
    }
}
