//! The replay-protected forwarder.

use crate::error::RelayError;
use crate::request::{keccak256, Eip712Domain, ForwardRequest};
use ethers_core::types::{Address, H256, U256};
use memebank_types::ForwardTarget;
use std::collections::HashMap;
use tracing::{info, warn};

/// The trusted signature capability: decides whether `signature`
/// authorizes `request` given its typed digest.
///
/// Implementations must bind the signature to `request.from`; the
/// forwarder handles nonces and dispatch, nothing else.
pub trait RequestVerifier {
    fn verify(&self, request: &ForwardRequest, digest: H256, signature: &[u8]) -> bool;
}

/// Keyed-MAC signature scheme over the typed digest.
///
/// `sign(digest) = keccak(secret ‖ digest)`. Stands in for ECDSA
/// recovery, which is an external collaborator; the verifier holds one
/// shared secret per registered sender.
#[derive(Debug, Clone)]
pub struct MacSigner {
    secret: Vec<u8>,
}

impl MacSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn sign(&self, digest: H256) -> Vec<u8> {
        let mut preimage = self.secret.clone();
        preimage.extend_from_slice(digest.as_bytes());
        keccak256(&preimage).as_bytes().to_vec()
    }
}

/// Verifier counterpart of [`MacSigner`].
#[derive(Debug, Clone, Default)]
pub struct MacVerifier {
    secrets: HashMap<Address, Vec<u8>>,
}

impl MacVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sender`'s shared secret.
    pub fn register(&mut self, sender: Address, secret: impl Into<Vec<u8>>) {
        self.secrets.insert(sender, secret.into());
    }
}

impl RequestVerifier for MacVerifier {
    fn verify(&self, request: &ForwardRequest, digest: H256, signature: &[u8]) -> bool {
        match self.secrets.get(&request.from) {
            Some(secret) => MacSigner::new(secret.clone()).sign(digest) == signature,
            None => false,
        }
    }
}

/// Generic forwarder: nonce registry plus verified dispatch. Owns no pool
/// semantics; `request.data` is opaque here.
#[derive(Debug)]
pub struct Forwarder<V> {
    address: Address,
    domain: Eip712Domain,
    verifier: V,
    nonces: HashMap<Address, U256>,
}

impl<V: RequestVerifier> Forwarder<V> {
    pub fn new(address: Address, chain_id: u64, verifier: V) -> Self {
        Self {
            address,
            domain: Eip712Domain::minimal_forwarder(chain_id, address),
            verifier,
            nonces: HashMap::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Next expected nonce for `from`; starts at zero.
    pub fn get_nonce(&self, from: Address) -> U256 {
        self.nonces.get(&from).copied().unwrap_or_default()
    }

    /// Typed signing digest for `request` under this forwarder's domain.
    pub fn digest(&self, request: &ForwardRequest) -> H256 {
        self.domain.digest(request)
    }

    /// Assemble an unsigned request against the sender's current nonce,
    /// with the customary defaults for `value` and `gas`.
    pub fn build_request(&self, from: Address, to: Address, data: Vec<u8>) -> ForwardRequest {
        ForwardRequest {
            from,
            to,
            value: U256::zero(),
            gas: U256::from(1_000_000u64),
            nonce: self.get_nonce(from),
            data,
        }
    }

    /// Signature recovers to `request.from` and the nonce is the sender's
    /// next expected one. Read-only; a true result does not reserve the
    /// nonce.
    pub fn verify(&self, request: &ForwardRequest, signature: &[u8]) -> bool {
        self.verifier
            .verify(request, self.digest(request), signature)
            && request.nonce == self.get_nonce(request.from)
    }

    /// Re-verify, consume the nonce, and dispatch.
    ///
    /// The nonce increment and the dispatch form one atomic unit: a
    /// failing forwarded call still consumed the nonce, so an identical
    /// (request, signature) pair can never execute twice.
    pub fn execute(
        &mut self,
        request: &ForwardRequest,
        signature: &[u8],
        target: &mut dyn ForwardTarget,
    ) -> Result<Vec<u8>, RelayError> {
        if !self.verify(request, signature) {
            return Err(RelayError::InvalidSignatureOrNonce);
        }
        if target.address() != request.to {
            return Err(RelayError::TargetMismatch {
                requested: request.to,
                actual: target.address(),
            });
        }

        self.nonces
            .insert(request.from, request.nonce + U256::one());

        match target.forward_call(self.address, request.from, request.value, &request.data) {
            Ok(output) => {
                info!(
                    from = ?request.from,
                    to = ?request.to,
                    nonce = %request.nonce,
                    data = %hex::encode(&request.data),
                    "forwarded call executed"
                );
                Ok(output)
            }
            Err(err) => {
                warn!(
                    from = ?request.from,
                    to = ?request.to,
                    nonce = %request.nonce,
                    error = %err,
                    "forwarded call reverted; nonce consumed"
                );
                Err(RelayError::CallReverted(err))
            }
        }
    }
}
