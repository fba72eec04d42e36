//! End-to-end test fixtures for the Memebank engine.
//!
//! Wires a market, an in-memory bank, a forwarder and a relayer together
//! the way a deployment would, with funded and approved accounts ready
//! for trading.

use ethers_core::types::{Address, U256};
use memebank_market::{InMemoryBank, Market, MarketConfig, TransferAsset};
use memebank_relay::{Forwarder, MacSigner, MacVerifier, Relayer};
use memebank_types::AssetId;
use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Route `RUST_LOG`-filtered engine logs to test output.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const CHAIN_ID: u64 = 1337;

pub struct E2eFixture {
    pub market: Market<InMemoryBank>,
    pub forwarder: Forwarder<MacVerifier>,
    pub relayer: Relayer,
    pub admin: Address,
    pub wallet: Address,
    pub wallet_signer: MacSigner,
    pub asset: AssetId,
}

impl E2eFixture {
    pub fn new() -> Self {
        init_tracing();

        let market_addr = Address::from_low_u64_be(0x1000);
        let forwarder_addr = Address::from_low_u64_be(0x2000);
        let admin = Address::from_low_u64_be(0x1);
        let wallet = Address::from_low_u64_be(0x2);
        let asset = AssetId::from(Address::from_low_u64_be(0xaaaa));

        let mut bank = InMemoryBank::new(market_addr);
        for &account in &[admin, wallet] {
            bank.deposit(TransferAsset::Meme(asset), account, U256::exp10(22));
            bank.deposit(TransferAsset::Payment, account, U256::exp10(22));
            bank.approve(TransferAsset::Meme(asset), account, U256::MAX);
            bank.approve(TransferAsset::Payment, account, U256::MAX);
        }

        let market = Market::new(
            MarketConfig::new(market_addr).with_trusted_forwarder(forwarder_addr),
            bank,
        );

        let wallet_signer = MacSigner::new(b"wallet-secret".to_vec());
        let mut verifier = MacVerifier::new();
        verifier.register(wallet, b"wallet-secret".to_vec());

        Self {
            market,
            forwarder: Forwarder::new(forwarder_addr, CHAIN_ID, verifier),
            relayer: Relayer::with_whitelist([market_addr]),
            admin,
            wallet,
            wallet_signer,
            asset,
        }
    }
}

impl Default for E2eFixture {
    fn default() -> Self {
        Self::new()
    }
}
