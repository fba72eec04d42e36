//! Constant-product quotes with integer fee scaling.

use ethers_core::types::U256;

/// Fee denominator: a 1/500 (0.2%) fee is charged on the input side of a
/// swap.
pub const FEE_MULTIPLIER: u64 = 500;

/// `FEE_MULTIPLIER - 1`; the input side keeps 499/500 of its weight in the
/// invariant.
pub const MULTIPLIER_SUB_ONE: u64 = FEE_MULTIPLIER - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("arithmetic overflow in curve computation")]
    Overflow,

    #[error("division by zero in curve computation")]
    DivisionByZero,

    #[error("requested output exceeds what the curve can supply")]
    InsufficientLiquidity,
}

fn mul(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

fn add(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

fn div(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_div(b).ok_or(MathError::DivisionByZero)
}

/// Curve math over a pool with reserves `(meme, payment)` where `payment`
/// includes the virtual offset.
pub struct CurveMath;

impl CurveMath {
    /// Meme tokens paid out for `payment_in` against reserves
    /// `(total_payment_reserve, meme_reserve)`.
    ///
    /// `out = (meme_reserve * 499) * payment_in
    ///        / (total_payment_reserve * 500 + payment_in * 499)`
    pub fn buy_tokens_out(
        payment_in: U256,
        total_payment_reserve: U256,
        meme_reserve: U256,
    ) -> Result<U256, MathError> {
        let fee = U256::from(FEE_MULTIPLIER);
        let fee_sub_one = U256::from(MULTIPLIER_SUB_ONE);

        let scaled_meme_reserve = mul(meme_reserve, fee_sub_one)?;
        let scaled_payment_reserve = mul(total_payment_reserve, fee)?;
        let divisor = add(scaled_payment_reserve, mul(payment_in, fee_sub_one)?)?;

        div(mul(scaled_meme_reserve, payment_in)?, divisor)
    }

    /// Payment paid out for selling `meme_in` into reserves
    /// `(meme_reserve, total_payment_reserve)`. Symmetric to
    /// [`Self::buy_tokens_out`] with the scaling factors swapped.
    pub fn sell_payment_out(
        meme_in: U256,
        meme_reserve: U256,
        total_payment_reserve: U256,
    ) -> Result<U256, MathError> {
        let fee = U256::from(FEE_MULTIPLIER);
        let fee_sub_one = U256::from(MULTIPLIER_SUB_ONE);

        let scaled_meme_reserve = mul(meme_reserve, fee)?;
        let scaled_payment_reserve = mul(total_payment_reserve, fee_sub_one)?;
        let divisor = add(scaled_meme_reserve, mul(meme_in, fee_sub_one)?)?;

        div(mul(scaled_payment_reserve, meme_in)?, divisor)
    }

    /// Inverse of [`Self::sell_payment_out`]: the meme amount that must be
    /// sold to draw `payment_out` from the pool.
    ///
    /// Rounds up by one so that re-running the forward quote on the result
    /// covers `payment_out` despite floor division. The requested payout
    /// must be strictly inside what the curve can supply, otherwise the
    /// divisor underflows and the quote is [`MathError::InsufficientLiquidity`].
    pub fn sell_tokens_in(
        payment_out: U256,
        meme_reserve: U256,
        total_payment_reserve: U256,
    ) -> Result<U256, MathError> {
        let fee = U256::from(FEE_MULTIPLIER);
        let fee_sub_one = U256::from(MULTIPLIER_SUB_ONE);

        let scaled_meme_reserve = mul(meme_reserve, fee)?;
        let scaled_payment_reserve = mul(total_payment_reserve, fee_sub_one)?;

        let divisor = scaled_payment_reserve
            .checked_sub(mul(payment_out, fee_sub_one)?)
            .ok_or(MathError::InsufficientLiquidity)?;
        if divisor.is_zero() {
            return Err(MathError::InsufficientLiquidity);
        }

        add(
            div(mul(payment_out, scaled_meme_reserve)?, divisor)?,
            U256::one(),
        )
    }

    /// Payment that must accompany `meme_in` to keep the pool ratio when
    /// adding liquidity: `meme_in * total_payment_reserve / meme_reserve`.
    pub fn payment_to_add(
        meme_in: U256,
        total_payment_reserve: U256,
        meme_reserve: U256,
    ) -> Result<U256, MathError> {
        div(mul(meme_in, total_payment_reserve)?, meme_reserve)
    }
}
