//! Market facade.
//!
//! The externally callable operation set: `init_pool`, `add_liquidity`,
//! `remove_liquidity`, `buy`, `sell`, plus read-only quotes and state
//! queries. Each mutating operation resolves the effective caller once at
//! entry, then runs validate → pull → pay out → mutate → emit; any failure
//! before the mutation step leaves engine state untouched and emits
//! nothing. When a second external transfer leg fails after a first one
//! succeeded, the first leg is compensated (the pulled deposit is
//! refunded, a paid-out leg is clawed back) before the error is returned.

use crate::bank::{AssetTransfer, TransferAsset};
use crate::config::MarketConfig;
use crate::error::MarketError;
use crate::ledger::ShareLedger;
use crate::pool::Pool;
use ethers_core::types::{Address, U256};
use memebank_amm::{CurveMath, MathError};
use memebank_types::{AssetId, CallOutcome, Caller, ForwardTarget, MarketCall, MarketEvent};
use std::collections::HashMap;
use tracing::{debug, error, info};

/// Result of a successful `add_liquidity` or `init_pool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityAddedOutcome {
    /// Real payment pulled alongside the meme deposit.
    pub payment_in: U256,
    pub shares_minted: U256,
}

/// Result of a successful `remove_liquidity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityRemovedOutcome {
    pub meme_out: U256,
    pub payment_out: U256,
}

/// The AMM engine: pools, LP shares and the bank capability, mutated only
/// through the serialized operations below.
#[derive(Debug)]
pub struct Market<T> {
    config: MarketConfig,
    bank: T,
    pools: HashMap<AssetId, Pool>,
    shares: ShareLedger,
    events: Vec<MarketEvent>,
}

impl<T: AssetTransfer> Market<T> {
    pub fn new(config: MarketConfig, bank: T) -> Self {
        Self {
            config,
            bank,
            pools: HashMap::new(),
            shares: ShareLedger::new(),
            events: Vec::new(),
        }
    }

    /// Initialize the pool for `asset`, seeding it with `meme_in` of the
    /// traded token, `payment_in` of real payment and a fixed
    /// `virtual_payment` offset. Mints `payment_in + virtual_payment` LP
    /// shares to the caller.
    pub fn init_pool(
        &mut self,
        caller: Caller,
        asset: AssetId,
        meme_in: U256,
        virtual_payment: U256,
        payment_in: U256,
    ) -> Result<LiquidityAddedOutcome, MarketError> {
        let sender = caller.sender();

        if self.pools.contains_key(&asset) {
            return Err(MarketError::PoolAlreadyInitialized(asset));
        }
        let shares_minted = virtual_payment
            .checked_add(payment_in)
            .ok_or(MathError::Overflow)?;
        if meme_in.is_zero() || shares_minted.is_zero() {
            return Err(MarketError::ZeroAmount);
        }

        self.bank
            .transfer_in(TransferAsset::Meme(asset), sender, meme_in)?;
        if !payment_in.is_zero() {
            if let Err(err) = self
                .bank
                .transfer_in(TransferAsset::Payment, sender, payment_in)
            {
                self.refund(TransferAsset::Meme(asset), sender, meme_in);
                return Err(err.into());
            }
        }

        self.pools.insert(
            asset,
            Pool {
                meme_reserve: meme_in,
                payment_reserve: payment_in,
                virtual_payment_reserve: virtual_payment,
            },
        );
        self.shares.mint(asset, sender, shares_minted)?;

        info!(
            %asset,
            sender = ?sender,
            relayed = caller.is_relayed(),
            %meme_in,
            %payment_in,
            %virtual_payment,
            %shares_minted,
            "pool initialized"
        );
        self.events.push(MarketEvent::LiquidityAdded {
            provider: sender,
            asset,
            meme_in,
            payment_in,
            shares_minted,
        });

        Ok(LiquidityAddedOutcome {
            payment_in,
            shares_minted,
        })
    }

    /// Add liquidity proportionally to the current pool ratio. The payment
    /// amount is dictated by the pool; the caller only bounds it from
    /// below with `min_payment`. The virtual reserve never grows here.
    pub fn add_liquidity(
        &mut self,
        caller: Caller,
        asset: AssetId,
        meme_in: U256,
        min_payment: U256,
    ) -> Result<LiquidityAddedOutcome, MarketError> {
        let sender = caller.sender();
        let pool = self.pool_or_err(asset)?;

        let total_payment = pool.total_payment_reserve()?;
        let payment_in = CurveMath::payment_to_add(meme_in, total_payment, pool.meme_reserve)?;
        if payment_in.is_zero() {
            return Err(MarketError::InsufficientPaymentSupplied);
        }
        if payment_in < min_payment {
            return Err(MarketError::PaymentBelowMinimum {
                required: payment_in,
                minimum: min_payment,
            });
        }

        let lp_supply = self.shares.supply_of(asset);
        let shares_minted = meme_in
            .checked_mul(lp_supply)
            .ok_or(MathError::Overflow)?
            / pool.meme_reserve;

        self.bank
            .transfer_in(TransferAsset::Meme(asset), sender, meme_in)?;
        if let Err(err) = self
            .bank
            .transfer_in(TransferAsset::Payment, sender, payment_in)
        {
            self.refund(TransferAsset::Meme(asset), sender, meme_in);
            return Err(err.into());
        }

        let updated = Pool {
            meme_reserve: pool.meme_reserve.checked_add(meme_in).ok_or(MathError::Overflow)?,
            payment_reserve: pool
                .payment_reserve
                .checked_add(payment_in)
                .ok_or(MathError::Overflow)?,
            virtual_payment_reserve: pool.virtual_payment_reserve,
        };
        self.pools.insert(asset, updated);
        self.shares.mint(asset, sender, shares_minted)?;

        info!(
            %asset,
            sender = ?sender,
            relayed = caller.is_relayed(),
            %meme_in,
            %payment_in,
            %shares_minted,
            "liquidity added"
        );
        self.events.push(MarketEvent::LiquidityAdded {
            provider: sender,
            asset,
            meme_in,
            payment_in,
            shares_minted,
        });

        Ok(LiquidityAddedOutcome {
            payment_in,
            shares_minted,
        })
    }

    /// Burn LP shares for a proportional payout of both real reserves.
    /// The virtual reserve is never paid out, so a full exit leaves the
    /// pool as a residual curve driven purely by the virtual offset.
    pub fn remove_liquidity(
        &mut self,
        caller: Caller,
        asset: AssetId,
        burn_amount: U256,
        min_meme_out: U256,
        min_payment_out: U256,
    ) -> Result<LiquidityRemovedOutcome, MarketError> {
        let sender = caller.sender();
        let pool = self.pool_or_err(asset)?;

        if burn_amount.is_zero() {
            return Err(MarketError::ZeroAmount);
        }
        let balance = self.shares.balance_of(asset, sender);
        if balance < burn_amount {
            return Err(MarketError::InsufficientShareBalance {
                balance,
                requested: burn_amount,
            });
        }

        // Pre-burn supply; positive because the sender's balance is.
        let lp_supply = self.shares.supply_of(asset);
        let meme_out = burn_amount
            .checked_mul(pool.meme_reserve)
            .ok_or(MathError::Overflow)?
            / lp_supply;
        let payment_out = burn_amount
            .checked_mul(pool.payment_reserve)
            .ok_or(MathError::Overflow)?
            / lp_supply;

        if meme_out < min_meme_out {
            return Err(MarketError::MemeOutputBelowMinimum {
                out: meme_out,
                minimum: min_meme_out,
            });
        }
        if payment_out < min_payment_out {
            return Err(MarketError::PaymentOutputBelowMinimum {
                out: payment_out,
                minimum: min_payment_out,
            });
        }

        if !meme_out.is_zero() {
            self.bank
                .transfer_out(TransferAsset::Meme(asset), sender, meme_out)?;
        }
        if !payment_out.is_zero() {
            if let Err(err) = self
                .bank
                .transfer_out(TransferAsset::Payment, sender, payment_out)
            {
                // Claw the meme leg back; the exit is all-or-nothing.
                if !meme_out.is_zero() {
                    if let Err(unwind) =
                        self.bank
                            .transfer_in(TransferAsset::Meme(asset), sender, meme_out)
                    {
                        error!(
                            %asset,
                            sender = ?sender,
                            %meme_out,
                            error = %unwind,
                            "failed to claw back the meme payout of an aborted exit"
                        );
                    }
                }
                return Err(err.into());
            }
        }

        self.shares.burn(asset, sender, burn_amount)?;
        let updated = Pool {
            // Payouts are proportional shares of the reserves, so these
            // subtractions cannot underflow.
            meme_reserve: pool.meme_reserve - meme_out,
            payment_reserve: pool.payment_reserve - payment_out,
            virtual_payment_reserve: pool.virtual_payment_reserve,
        };
        self.pools.insert(asset, updated);

        info!(
            %asset,
            sender = ?sender,
            relayed = caller.is_relayed(),
            %meme_out,
            %payment_out,
            %burn_amount,
            "liquidity removed"
        );
        self.events.push(MarketEvent::LiquidityRemoved {
            provider: sender,
            asset,
            meme_out,
            payment_out,
            shares_burned: burn_amount,
        });

        Ok(LiquidityRemovedOutcome {
            meme_out,
            payment_out,
        })
    }

    /// Swap `payment_in` of the payment asset for meme tokens.
    pub fn buy(
        &mut self,
        caller: Caller,
        asset: AssetId,
        payment_in: U256,
        min_meme_out: U256,
    ) -> Result<U256, MarketError> {
        let sender = caller.sender();
        let pool = self.pool_or_err(asset)?;

        let total_payment = pool.total_payment_reserve()?;
        let meme_out = CurveMath::buy_tokens_out(payment_in, total_payment, pool.meme_reserve)?;
        if meme_out.is_zero() {
            return Err(MarketError::InsufficientLiquidity);
        }
        if meme_out < min_meme_out {
            return Err(MarketError::InsufficientOutput {
                out: meme_out,
                minimum: min_meme_out,
            });
        }

        self.bank
            .transfer_in(TransferAsset::Payment, sender, payment_in)?;
        if let Err(err) = self
            .bank
            .transfer_out(TransferAsset::Meme(asset), sender, meme_out)
        {
            self.refund(TransferAsset::Payment, sender, payment_in);
            return Err(err.into());
        }

        let updated = Pool {
            // The curve payout is strictly inside the reserve.
            meme_reserve: pool.meme_reserve - meme_out,
            payment_reserve: pool
                .payment_reserve
                .checked_add(payment_in)
                .ok_or(MathError::Overflow)?,
            virtual_payment_reserve: pool.virtual_payment_reserve,
        };
        self.pools.insert(asset, updated);

        info!(
            %asset,
            sender = ?sender,
            relayed = caller.is_relayed(),
            %payment_in,
            %meme_out,
            "buy"
        );
        self.events.push(MarketEvent::Buy {
            trader: sender,
            asset,
            payment_in,
            meme_out,
        });

        Ok(meme_out)
    }

    /// Swap `meme_in` meme tokens for the payment asset. The payout must
    /// fit in the real payment reserve; the virtual portion is phantom and
    /// can never be drawn down.
    pub fn sell(
        &mut self,
        caller: Caller,
        asset: AssetId,
        meme_in: U256,
        min_payment_out: U256,
    ) -> Result<U256, MarketError> {
        let sender = caller.sender();
        let pool = self.pool_or_err(asset)?;

        let total_payment = pool.total_payment_reserve()?;
        let payment_out = CurveMath::sell_payment_out(meme_in, pool.meme_reserve, total_payment)?;
        if payment_out.is_zero() {
            return Err(MarketError::InsufficientLiquidity);
        }
        if payment_out > pool.payment_reserve {
            return Err(MarketError::InsufficientLiquidity);
        }
        if payment_out < min_payment_out {
            return Err(MarketError::InsufficientOutput {
                out: payment_out,
                minimum: min_payment_out,
            });
        }

        self.bank
            .transfer_in(TransferAsset::Meme(asset), sender, meme_in)?;
        if let Err(err) = self
            .bank
            .transfer_out(TransferAsset::Payment, sender, payment_out)
        {
            self.refund(TransferAsset::Meme(asset), sender, meme_in);
            return Err(err.into());
        }

        let updated = Pool {
            meme_reserve: pool
                .meme_reserve
                .checked_add(meme_in)
                .ok_or(MathError::Overflow)?,
            payment_reserve: pool.payment_reserve - payment_out,
            virtual_payment_reserve: pool.virtual_payment_reserve,
        };
        self.pools.insert(asset, updated);

        info!(
            %asset,
            sender = ?sender,
            relayed = caller.is_relayed(),
            %payment_out,
            %meme_in,
            "sell"
        );
        self.events.push(MarketEvent::Sell {
            trader: sender,
            asset,
            payment_out,
            meme_in,
        });

        Ok(payment_out)
    }

    /// Funnel for relayed calls.
    pub fn dispatch(
        &mut self,
        caller: Caller,
        call: MarketCall,
    ) -> Result<CallOutcome, MarketError> {
        match call {
            MarketCall::InitPool {
                asset,
                meme_in,
                virtual_payment,
                payment_in,
            } => {
                let outcome =
                    self.init_pool(caller, asset, meme_in, virtual_payment, payment_in)?;
                Ok(CallOutcome::LiquidityAdded {
                    payment_in: outcome.payment_in,
                    shares_minted: outcome.shares_minted,
                })
            }
            MarketCall::AddLiquidity {
                asset,
                meme_in,
                min_payment,
            } => {
                let outcome = self.add_liquidity(caller, asset, meme_in, min_payment)?;
                Ok(CallOutcome::LiquidityAdded {
                    payment_in: outcome.payment_in,
                    shares_minted: outcome.shares_minted,
                })
            }
            MarketCall::RemoveLiquidity {
                asset,
                burn_amount,
                min_meme_out,
                min_payment_out,
            } => {
                let outcome =
                    self.remove_liquidity(caller, asset, burn_amount, min_meme_out, min_payment_out)?;
                Ok(CallOutcome::LiquidityRemoved {
                    meme_out: outcome.meme_out,
                    payment_out: outcome.payment_out,
                })
            }
            MarketCall::Buy {
                asset,
                payment_in,
                min_meme_out,
            } => {
                let meme_out = self.buy(caller, asset, payment_in, min_meme_out)?;
                Ok(CallOutcome::Bought { meme_out })
            }
            MarketCall::Sell {
                asset,
                meme_in,
                min_payment_out,
            } => {
                let payment_out = self.sell(caller, asset, meme_in, min_payment_out)?;
                Ok(CallOutcome::Sold { payment_out })
            }
        }
    }

    // ---- read-only queries ----

    pub fn is_initialized(&self, asset: AssetId) -> bool {
        self.pools.contains_key(&asset)
    }

    pub fn pool(&self, asset: AssetId) -> Option<&Pool> {
        self.pools.get(&asset)
    }

    pub fn meme_reserve(&self, asset: AssetId) -> U256 {
        self.pools
            .get(&asset)
            .map(|p| p.meme_reserve)
            .unwrap_or_default()
    }

    pub fn payment_reserve(&self, asset: AssetId) -> U256 {
        self.pools
            .get(&asset)
            .map(|p| p.payment_reserve)
            .unwrap_or_default()
    }

    pub fn virtual_payment_reserve(&self, asset: AssetId) -> U256 {
        self.pools
            .get(&asset)
            .map(|p| p.virtual_payment_reserve)
            .unwrap_or_default()
    }

    /// Effective payment side of the curve for `asset`.
    pub fn total_payment_reserve(&self, asset: AssetId) -> Result<U256, MarketError> {
        Ok(self.pool_or_err(asset)?.total_payment_reserve()?)
    }

    pub fn lp_supply(&self, asset: AssetId) -> U256 {
        self.shares.supply_of(asset)
    }

    pub fn lp_balance(&self, asset: AssetId, holder: Address) -> U256 {
        self.shares.balance_of(asset, holder)
    }

    /// Quote a hypothetical buy without mutating state.
    pub fn quote_buy(&self, asset: AssetId, payment_in: U256) -> Result<U256, MarketError> {
        let pool = self.pool_or_err(asset)?;
        Ok(CurveMath::buy_tokens_out(
            payment_in,
            pool.total_payment_reserve()?,
            pool.meme_reserve,
        )?)
    }

    /// Quote a hypothetical sell without mutating state.
    pub fn quote_sell(&self, asset: AssetId, meme_in: U256) -> Result<U256, MarketError> {
        let pool = self.pool_or_err(asset)?;
        Ok(CurveMath::sell_payment_out(
            meme_in,
            pool.meme_reserve,
            pool.total_payment_reserve()?,
        )?)
    }

    /// Meme amount that must be sold to draw `payment_out` from the pool.
    pub fn quote_sell_tokens_in(
        &self,
        asset: AssetId,
        payment_out: U256,
    ) -> Result<U256, MarketError> {
        let pool = self.pool_or_err(asset)?;
        Ok(CurveMath::sell_tokens_in(
            payment_out,
            pool.meme_reserve,
            pool.total_payment_reserve()?,
        )?)
    }

    /// Payment that `add_liquidity` would pull alongside `meme_in`.
    pub fn quote_payment_to_add(
        &self,
        asset: AssetId,
        meme_in: U256,
    ) -> Result<U256, MarketError> {
        let pool = self.pool_or_err(asset)?;
        Ok(CurveMath::payment_to_add(
            meme_in,
            pool.total_payment_reserve()?,
            pool.meme_reserve,
        )?)
    }

    pub fn is_trusted_forwarder(&self, forwarder: Address) -> bool {
        self.config.trusted_forwarder == Some(forwarder)
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn bank(&self) -> &T {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut T {
        &mut self.bank
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[MarketEvent] {
        &self.events
    }

    /// Take and clear the event journal.
    pub fn drain_events(&mut self) -> Vec<MarketEvent> {
        std::mem::take(&mut self.events)
    }

    /// Return an already-pulled deposit after a later leg failed. A refund
    /// failure strands the funds in engine custody; it is logged, and the
    /// operation error already in flight is the one reported.
    fn refund(&mut self, asset: TransferAsset, to: Address, amount: U256) {
        if let Err(err) = self.bank.transfer_out(asset, to, amount) {
            error!(
                ?asset,
                to = ?to,
                %amount,
                error = %err,
                "refund of an aborted operation failed"
            );
        }
    }

    fn pool_or_err(&self, asset: AssetId) -> Result<Pool, MarketError> {
        self.pools
            .get(&asset)
            .copied()
            .ok_or(MarketError::PoolNotInitialized(asset))
    }
}

impl<T: AssetTransfer> ForwardTarget for Market<T> {
    fn address(&self) -> Address {
        self.config.address
    }

    fn forward_call(
        &mut self,
        forwarder: Address,
        sender: Address,
        value: U256,
        data: &[u8],
    ) -> anyhow::Result<Vec<u8>> {
        // ERC-2771 semantics: only the trusted forwarder's word on the
        // original sender is believed.
        let caller = if self.is_trusted_forwarder(forwarder) {
            Caller::Relayed {
                relayer: forwarder,
                sender,
            }
        } else {
            Caller::Direct(forwarder)
        };
        debug!(forwarder = ?forwarder, sender = ?sender, %value, "dispatching forwarded call");

        let call = MarketCall::decode(data)?;
        let outcome = self.dispatch(caller, call)?;
        Ok(outcome.encode()?)
    }
}
