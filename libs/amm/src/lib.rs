//! # Memebank AMM Math
//!
//! Pure constant-product curve math for the Memebank liquidity engine.
//!
//! All quotes are computed over unsigned 256-bit integers with checked
//! arithmetic and floor division: no floating point and no silent wrapping.
//! The trading fee is folded into the invariant by scaling the two sides
//! of the curve with complementary integer factors (499 vs 500), which
//! keeps the computation exact and the reserve product non-decreasing
//! across fee-bearing trades.
//!
//! The functions here are stateless; pool bookkeeping lives in
//! `memebank-market`.

pub mod curve;

pub use curve::{CurveMath, MathError, FEE_MULTIPLIER, MULTIPLIER_SUB_ONE};

pub use ethers_core::types::U256;
