//! Direct and relayed flows against one market deployment.

use ethers_core::types::{Address, U256};
use memebank_e2e_tests::E2eFixture;
use memebank_market::{MarketError, TransferAsset};
use memebank_relay::{Forwarder, MacVerifier, RelayError};
use memebank_types::{CallOutcome, Caller, MarketCall, MarketEvent};

fn one() -> U256 {
    U256::exp10(18)
}

/// Sign `call` with the fixture wallet and push it through the relayer.
fn relay_call(f: &mut E2eFixture, call: MarketCall) -> Result<CallOutcome, RelayError> {
    let data = call.encode().unwrap();
    let request = f
        .forwarder
        .build_request(f.wallet, f.market.config().address, data);
    let signature = f.wallet_signer.sign(f.forwarder.digest(&request));

    let output = f
        .relayer
        .relay(&mut f.forwarder, &request, &signature, &mut f.market)?;
    Ok(CallOutcome::decode(&output).unwrap())
}

#[test]
fn relayed_init_is_attributed_to_the_signer() {
    let mut f = E2eFixture::new();
    let asset = f.asset;

    let outcome = relay_call(
        &mut f,
        MarketCall::InitPool {
            asset,
            meme_in: one(),
            virtual_payment: one(),
            payment_in: U256::zero(),
        },
    )
    .unwrap();

    assert_eq!(
        outcome,
        CallOutcome::LiquidityAdded {
            payment_in: U256::zero(),
            shares_minted: one(),
        }
    );
    assert_eq!(f.market.lp_balance(f.asset, f.wallet), one());
    // The signer, not the forwarder, shows up in the event record.
    assert_eq!(
        f.market.events(),
        &[MarketEvent::LiquidityAdded {
            provider: f.wallet,
            asset: f.asset,
            meme_in: one(),
            payment_in: U256::zero(),
            shares_minted: one(),
        }]
    );
}

#[test]
fn relayed_buy_matches_the_direct_quote() {
    let mut f = E2eFixture::new();
    f.market
        .init_pool(Caller::Direct(f.admin), f.asset, one(), one(), U256::zero())
        .unwrap();

    let expected = f.market.quote_buy(f.asset, one()).unwrap();
    let meme_before = f
        .market
        .bank()
        .balance_of(TransferAsset::Meme(f.asset), f.wallet);

    let asset = f.asset;
    let outcome = relay_call(
        &mut f,
        MarketCall::Buy {
            asset,
            payment_in: one(),
            min_meme_out: expected,
        },
    )
    .unwrap();

    assert_eq!(outcome, CallOutcome::Bought { meme_out: expected });
    assert_eq!(
        f.market
            .bank()
            .balance_of(TransferAsset::Meme(f.asset), f.wallet),
        meme_before + expected
    );
    assert_eq!(
        f.market.events().last().unwrap(),
        &MarketEvent::Buy {
            trader: f.wallet,
            asset: f.asset,
            payment_in: one(),
            meme_out: expected,
        }
    );
}

#[test]
fn replayed_request_is_rejected() {
    let mut f = E2eFixture::new();
    f.market
        .init_pool(Caller::Direct(f.admin), f.asset, one(), one(), U256::zero())
        .unwrap();

    let call = MarketCall::Buy {
        asset: f.asset,
        payment_in: one(),
        min_meme_out: U256::zero(),
    };
    let request = f.forwarder.build_request(
        f.wallet,
        f.market.config().address,
        call.encode().unwrap(),
    );
    let signature = f.wallet_signer.sign(f.forwarder.digest(&request));

    f.relayer
        .relay(&mut f.forwarder, &request, &signature, &mut f.market)
        .unwrap();
    let err = f
        .relayer
        .relay(&mut f.forwarder, &request, &signature, &mut f.market)
        .unwrap_err();
    assert!(matches!(err, RelayError::InvalidSignatureOrNonce));
    // Exactly one buy happened.
    assert_eq!(f.market.events().len(), 2);
}

#[test]
fn reverted_market_call_burns_the_nonce_and_emits_nothing() {
    let mut f = E2eFixture::new();
    f.market
        .init_pool(Caller::Direct(f.admin), f.asset, one(), one(), U256::zero())
        .unwrap();

    let quote = f.market.quote_buy(f.asset, one()).unwrap();
    let asset = f.asset;
    let err = relay_call(
        &mut f,
        MarketCall::Buy {
            asset,
            payment_in: one(),
            min_meme_out: quote + U256::one(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, RelayError::CallReverted(_)));

    assert_eq!(f.forwarder.get_nonce(f.wallet), U256::one());
    assert_eq!(f.market.events().len(), 1); // only the init
    assert_eq!(f.market.payment_reserve(f.asset), U256::zero());
}

#[test]
fn untrusted_forwarder_is_treated_as_a_direct_caller() {
    let mut f = E2eFixture::new();

    // A rogue forwarder with its own verifier that accepts the wallet.
    let rogue_addr = Address::from_low_u64_be(0x6666);
    let mut verifier = MacVerifier::new();
    verifier.register(f.wallet, b"wallet-secret".to_vec());
    let mut rogue = Forwarder::new(rogue_addr, memebank_e2e_tests::CHAIN_ID, verifier);

    let call = MarketCall::InitPool {
        asset: f.asset,
        meme_in: one(),
        virtual_payment: one(),
        payment_in: U256::zero(),
    };
    let request = rogue.build_request(f.wallet, f.market.config().address, call.encode().unwrap());
    let signature = f.wallet_signer.sign(rogue.digest(&request));

    // The market does not believe the rogue forwarder's sender claim, so
    // the effective caller is the forwarder itself, which holds no funds.
    let err = rogue.execute(&request, &signature, &mut f.market).unwrap_err();
    assert!(matches!(err, RelayError::CallReverted(_)));
    assert!(!f.market.is_initialized(f.asset));
    assert!(f.market.events().is_empty());
}

#[test]
fn relayer_whitelist_guards_the_market() {
    let mut f = E2eFixture::new();
    let call = MarketCall::Buy {
        asset: f.asset,
        payment_in: one(),
        min_meme_out: U256::zero(),
    };
    // Request aimed at an address the relayer does not serve.
    let elsewhere = Address::from_low_u64_be(0x7777);
    let request = f
        .forwarder
        .build_request(f.wallet, elsewhere, call.encode().unwrap());
    let signature = f.wallet_signer.sign(f.forwarder.digest(&request));

    let err = f
        .relayer
        .relay(&mut f.forwarder, &request, &signature, &mut f.market)
        .unwrap_err();
    assert!(matches!(err, RelayError::RejectedTarget(_)));
    assert_eq!(f.forwarder.get_nonce(f.wallet), U256::zero());
}

#[test]
fn full_lifecycle_mixing_direct_and_relayed_calls() {
    let mut f = E2eFixture::new();
    let asset = f.asset;

    // Admin seeds the pool directly with real payment.
    f.market
        .init_pool(Caller::Direct(f.admin), f.asset, one(), one(), one())
        .unwrap();

    // Wallet joins through the relay.
    let add = relay_call(
        &mut f,
        MarketCall::AddLiquidity {
            asset,
            meme_in: U256::exp10(17),
            min_payment: U256::zero(),
        },
    )
    .unwrap();
    let CallOutcome::LiquidityAdded { shares_minted, .. } = add else {
        panic!("unexpected outcome: {add:?}");
    };
    assert_eq!(f.market.lp_balance(f.asset, f.wallet), shares_minted);

    // Trade both ways through the relay.
    let CallOutcome::Bought { meme_out } = relay_call(
        &mut f,
        MarketCall::Buy {
            asset,
            payment_in: one(),
            min_meme_out: U256::zero(),
        },
    )
    .unwrap() else {
        panic!("expected a buy outcome");
    };
    relay_call(
        &mut f,
        MarketCall::Sell {
            asset,
            meme_in: meme_out / 2u64,
            min_payment_out: U256::zero(),
        },
    )
    .unwrap();

    // Wallet exits its whole position through the relay.
    relay_call(
        &mut f,
        MarketCall::RemoveLiquidity {
            asset,
            burn_amount: shares_minted,
            min_meme_out: U256::zero(),
            min_payment_out: U256::zero(),
        },
    )
    .unwrap();
    assert_eq!(f.market.lp_balance(f.asset, f.wallet), U256::zero());

    // Ledger and nonce bookkeeping held up across the whole run.
    assert_eq!(
        f.market.lp_supply(f.asset),
        f.market.lp_balance(f.asset, f.admin)
    );
    assert_eq!(f.forwarder.get_nonce(f.wallet), U256::from(4u64));
    // One event per successful call; the direct init is the admin's, every
    // relayed call is attributed to the signing wallet.
    let events = f.market.events();
    assert_eq!(events.len(), 5);
    assert!(events.iter().all(|e| e.asset() == f.asset));
    assert_eq!(events[0].account(), f.admin);
    assert!(events[1..].iter().all(|e| e.account() == f.wallet));
    assert!(f.market.virtual_payment_reserve(f.asset) == one());
}
