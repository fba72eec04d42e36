//! Relay error taxonomy.

use ethers_core::types::Address;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The relayer's whitelist does not allow forwarding to this target.
    #[error("request target {0:#x} is not whitelisted")]
    RejectedTarget(Address),

    /// The request names a different target than the one supplied.
    #[error("request targets {requested:#x} but was dispatched to {actual:#x}")]
    TargetMismatch { requested: Address, actual: Address },

    /// Signature does not verify for `request.from`, or the nonce is not
    /// the sender's next expected nonce. Raised before any state change.
    #[error("invalid signature or nonce")]
    InvalidSignatureOrNonce,

    /// The forwarded call itself failed. The sender's nonce was already
    /// consumed; resubmitting the same request can never succeed.
    #[error("forwarded call reverted: {0}")]
    CallReverted(#[source] anyhow::Error),
}
