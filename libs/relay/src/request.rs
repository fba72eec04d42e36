//! Forward request envelope and EIP-712 hashing.
//!
//! The request layout and type strings match the MinimalForwarder wire
//! format, so signatures produced against that scheme hash identically
//! here.

use ethers_core::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

const FORWARD_REQUEST_TYPE: &[u8] =
    b"ForwardRequest(address from,address to,uint256 value,uint256 gas,uint256 nonce,bytes data)";

const EIP712_DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

pub(crate) fn keccak256(data: &[u8]) -> H256 {
    H256::from_slice(&Keccak256::digest(data))
}

fn word_from_u256(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

fn word_from_address(addr: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(addr.as_bytes());
    word
}

/// An intended call on behalf of `from`, replay-protected by `nonce`.
///
/// Created and signed by the initiator off-line, consumed exactly once by
/// the forwarder. `data` carries the bincode-encoded market call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardRequest {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub gas: U256,
    pub nonce: U256,
    pub data: Vec<u8>,
}

impl ForwardRequest {
    /// EIP-712 struct hash: `keccak(typehash ‖ abi-encoded fields)` with
    /// `data` folded in as `keccak(data)`.
    pub fn struct_hash(&self) -> H256 {
        let mut encoded = Vec::with_capacity(7 * 32);
        encoded.extend_from_slice(keccak256(FORWARD_REQUEST_TYPE).as_bytes());
        encoded.extend_from_slice(&word_from_address(self.from));
        encoded.extend_from_slice(&word_from_address(self.to));
        encoded.extend_from_slice(&word_from_u256(self.value));
        encoded.extend_from_slice(&word_from_u256(self.gas));
        encoded.extend_from_slice(&word_from_u256(self.nonce));
        encoded.extend_from_slice(keccak256(&self.data).as_bytes());
        keccak256(&encoded)
    }
}

/// EIP-712 signing domain binding requests to one forwarder deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: U256,
    pub verifying_contract: Address,
}

impl Eip712Domain {
    /// Domain as the MinimalForwarder declares it.
    pub fn minimal_forwarder(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: "MinimalForwarder".to_owned(),
            version: "0.0.1".to_owned(),
            chain_id: U256::from(chain_id),
            verifying_contract,
        }
    }

    pub fn separator(&self) -> H256 {
        let mut encoded = Vec::with_capacity(5 * 32);
        encoded.extend_from_slice(keccak256(EIP712_DOMAIN_TYPE).as_bytes());
        encoded.extend_from_slice(keccak256(self.name.as_bytes()).as_bytes());
        encoded.extend_from_slice(keccak256(self.version.as_bytes()).as_bytes());
        encoded.extend_from_slice(&word_from_u256(self.chain_id));
        encoded.extend_from_slice(&word_from_address(self.verifying_contract));
        keccak256(&encoded)
    }

    /// Final signing digest: `keccak("\x19\x01" ‖ separator ‖ struct_hash)`.
    pub fn digest(&self, request: &ForwardRequest) -> H256 {
        let mut encoded = Vec::with_capacity(2 + 64);
        encoded.extend_from_slice(&[0x19, 0x01]);
        encoded.extend_from_slice(self.separator().as_bytes());
        encoded.extend_from_slice(request.struct_hash().as_bytes());
        keccak256(&encoded)
    }
}
