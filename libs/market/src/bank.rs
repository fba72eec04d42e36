//! Asset transfer capability.
//!
//! The engine never moves tokens itself; it asks this collaborator to pull
//! funds in or pay them out and treats any failure as an abort of the whole
//! operation. [`InMemoryBank`] is the reference implementation backing the
//! test suites: ERC20-like balances with an approval step before the engine
//! may pull from an account.

use ethers_core::types::{Address, U256};
use memebank_types::AssetId;
use std::collections::HashMap;

/// Which asset a transfer moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferAsset {
    /// The traded meme token behind `AssetId`.
    Meme(AssetId),
    /// The single payment asset all pools are paired against.
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("transfer amount exceeds balance")]
    InsufficientBalance,

    #[error("insufficient allowance")]
    InsufficientAllowance,
}

/// External token movement, from the engine's point of view.
pub trait AssetTransfer {
    /// Pull `amount` of `asset` from `from` into the engine's custody.
    fn transfer_in(
        &mut self,
        asset: TransferAsset,
        from: Address,
        amount: U256,
    ) -> Result<(), TransferError>;

    /// Pay `amount` of `asset` out of the engine's custody to `to`.
    fn transfer_out(
        &mut self,
        asset: TransferAsset,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError>;
}

/// In-memory ERC20-like bank.
///
/// Pulls require a prior [`InMemoryBank::approve`] from the owner; an
/// allowance of `U256::MAX` is treated as unlimited and never decremented.
#[derive(Debug, Clone)]
pub struct InMemoryBank {
    engine: Address,
    balances: HashMap<(TransferAsset, Address), U256>,
    allowances: HashMap<(TransferAsset, Address), U256>,
}

impl InMemoryBank {
    pub fn new(engine: Address) -> Self {
        Self {
            engine,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// Credit `account` out of thin air. Test setup.
    pub fn deposit(&mut self, asset: TransferAsset, account: Address, amount: U256) {
        let entry = self.balances.entry((asset, account)).or_default();
        *entry += amount;
    }

    /// Let the engine pull up to `amount` of `asset` from `owner`.
    pub fn approve(&mut self, asset: TransferAsset, owner: Address, amount: U256) {
        self.allowances.insert((asset, owner), amount);
    }

    pub fn balance_of(&self, asset: TransferAsset, account: Address) -> U256 {
        self.balances
            .get(&(asset, account))
            .copied()
            .unwrap_or_default()
    }

    pub fn allowance(&self, asset: TransferAsset, owner: Address) -> U256 {
        self.allowances
            .get(&(asset, owner))
            .copied()
            .unwrap_or_default()
    }

    fn move_funds(
        &mut self,
        asset: TransferAsset,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        let from_balance = self.balance_of(asset, from);
        let remaining = from_balance
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientBalance)?;

        self.balances.insert((asset, from), remaining);
        let to_entry = self.balances.entry((asset, to)).or_default();
        *to_entry += amount;
        Ok(())
    }
}

impl AssetTransfer for InMemoryBank {
    fn transfer_in(
        &mut self,
        asset: TransferAsset,
        from: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        // Allowance is spent before the balance is checked, as ERC20 does.
        let allowance = self.allowance(asset, from);
        let remaining = allowance
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientAllowance)?;

        let engine = self.engine;
        self.move_funds(asset, from, engine, amount)?;

        if allowance != U256::MAX {
            self.allowances.insert((asset, from), remaining);
        }
        Ok(())
    }

    fn transfer_out(
        &mut self,
        asset: TransferAsset,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        let engine = self.engine;
        self.move_funds(asset, engine, to, amount)
    }
}
