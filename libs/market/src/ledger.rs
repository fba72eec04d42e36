//! LP share ledger.
//!
//! Multi-asset fungible bookkeeping keyed by `(asset, holder)`, consumed
//! by the market facade. The ledger knows nothing about pools or curves;
//! it only guarantees that each asset's supply equals the sum of its
//! holder balances at all times.

use ethers_core::types::{Address, U256};
use memebank_types::AssetId;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("holder {holder:#x} has {balance} shares of {asset}, cannot burn {requested}")]
    InsufficientBalance {
        asset: AssetId,
        holder: Address,
        balance: U256,
        requested: U256,
    },

    #[error("share supply overflow for asset {0}")]
    SupplyOverflow(AssetId),
}

/// Balances and per-asset supplies for LP shares.
#[derive(Debug, Clone, Default)]
pub struct ShareLedger {
    balances: HashMap<(AssetId, Address), U256>,
    supplies: HashMap<AssetId, U256>,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, asset: AssetId, holder: Address) -> U256 {
        self.balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or_default()
    }

    pub fn supply_of(&self, asset: AssetId) -> U256 {
        self.supplies.get(&asset).copied().unwrap_or_default()
    }

    /// Mint `amount` shares of `asset` to `holder`.
    pub fn mint(
        &mut self,
        asset: AssetId,
        holder: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let new_supply = self
            .supply_of(asset)
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow(asset))?;
        // Balance cannot overflow if the supply did not.
        let new_balance = self.balance_of(asset, holder) + amount;

        self.supplies.insert(asset, new_supply);
        self.balances.insert((asset, holder), new_balance);
        Ok(())
    }

    /// Burn `amount` shares of `asset` from `holder`. Fails without any
    /// state change if the holder's balance is too small.
    pub fn burn(
        &mut self,
        asset: AssetId,
        holder: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let balance = self.balance_of(asset, holder);
        let new_balance = balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                asset,
                holder,
                balance,
                requested: amount,
            })?;
        // Supply >= any single balance by the ledger invariant.
        let new_supply = self.supply_of(asset) - amount;

        if new_balance.is_zero() {
            self.balances.remove(&(asset, holder));
        } else {
            self.balances.insert((asset, holder), new_balance);
        }
        if new_supply.is_zero() {
            self.supplies.remove(&asset);
        } else {
            self.supplies.insert(asset, new_supply);
        }
        Ok(())
    }

    /// Mint several `(asset, amount)` pairs to one holder atomically:
    /// either every entry applies or none does.
    pub fn mint_batch(
        &mut self,
        holder: Address,
        entries: &[(AssetId, U256)],
    ) -> Result<(), LedgerError> {
        // Validate the whole batch against a scratch view before touching
        // real state; duplicate assets within a batch accumulate.
        let mut staged: HashMap<AssetId, U256> = HashMap::new();
        for &(asset, amount) in entries {
            let current = staged
                .get(&asset)
                .copied()
                .unwrap_or_else(|| self.supply_of(asset));
            let next = current
                .checked_add(amount)
                .ok_or(LedgerError::SupplyOverflow(asset))?;
            staged.insert(asset, next);
        }

        for &(asset, amount) in entries {
            self.mint(asset, holder, amount)?;
        }
        Ok(())
    }

    /// Burn several `(asset, amount)` pairs from one holder atomically.
    pub fn burn_batch(
        &mut self,
        holder: Address,
        entries: &[(AssetId, U256)],
    ) -> Result<(), LedgerError> {
        let mut staged: HashMap<AssetId, U256> = HashMap::new();
        for &(asset, amount) in entries {
            let current = staged
                .get(&asset)
                .copied()
                .unwrap_or_else(|| self.balance_of(asset, holder));
            let next = current
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientBalance {
                    asset,
                    holder,
                    balance: current,
                    requested: amount,
                })?;
            staged.insert(asset, next);
        }

        for &(asset, amount) in entries {
            self.burn(asset, holder, amount)?;
        }
        Ok(())
    }

    /// Sum of all holder balances for `asset`; equals `supply_of` by the
    /// ledger invariant. Test support.
    pub fn summed_balances(&self, asset: AssetId) -> U256 {
        self.balances
            .iter()
            .filter(|((a, _), _)| *a == asset)
            .fold(U256::zero(), |acc, (_, amount)| acc + amount)
    }
}
