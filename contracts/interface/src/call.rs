//! Call and addressing primitives.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

/// Account address. 32 raw bytes; the host decides how addresses are
/// derived, the program only compares them.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub const ZERO: Address = Address([0u8; 32]);
}

impl core::fmt::Debug for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..8]))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }
}

/// Entrypoint selector: the first 4 bytes of SHA-256 over the entrypoint
/// name, mirroring how hosts address entrypoints by name hash.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector(pub [u8; 4]);

impl core::fmt::Debug for Selector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Selector({})", hex::encode(self.0))
    }
}

/// Compute the selector for an entrypoint name.
pub fn selector(name: &str) -> Selector {
    let digest = Sha256::digest(name.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    Selector(out)
}

/// A single call inside a transaction: target contract, entrypoint
/// selector and opaque calldata. Calls targeting the account itself carry
/// a borsh-encoded management instruction as calldata.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub to: Address,
    pub selector: Selector,
    pub calldata: Vec<u8>,
}

impl Call {
    pub fn new(to: Address, selector: Selector, calldata: Vec<u8>) -> Self {
        Self {
            to,
            selector,
            calldata,
        }
    }
}
