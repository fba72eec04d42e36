//! # Memebank Relay
//!
//! Meta-transaction support: a user signs an intended market call
//! off-line, anyone may submit it, and the market executes it with the
//! signer (not the submitter) as the effective caller.
//!
//! Three layers, outermost first:
//!
//! - [`relayer::Relayer`] applies submission policy: an optional
//!   whitelist of forwardable targets, checked before the forwarder is
//!   touched.
//! - [`forwarder::Forwarder`] is the replay-protected core: per-sender
//!   nonce registry, signature verification over the EIP-712 digest, and
//!   atomic nonce-increment-plus-dispatch. A reverted forwarded call
//!   still consumes the nonce; replay protection outranks call success.
//! - [`request::ForwardRequest`] is the signed envelope
//!   `{from, to, value, gas, nonce, data}` and its EIP-712 hashing.
//!
//! The relay knows nothing about pools or curves; it dispatches opaque
//! bytes into any [`memebank_types::ForwardTarget`]. Signature recovery
//! itself is a pluggable capability ([`forwarder::RequestVerifier`]); the
//! shipped [`forwarder::MacVerifier`] is a keyed-MAC scheme over the
//! typed digest for deployments where full ECDSA recovery lives outside
//! the engine.

pub mod error;
pub mod forwarder;
pub mod relayer;
pub mod request;

pub use error::RelayError;
pub use forwarder::{Forwarder, MacSigner, MacVerifier, RequestVerifier};
pub use relayer::{RelayConfig, RelayConfigError, Relayer};
pub use request::{Eip712Domain, ForwardRequest};
