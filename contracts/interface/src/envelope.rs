//! Transaction envelope and hashing.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

use crate::call::{Address, Call};

/// Invoke transaction, current version.
pub const TX_VERSION_V1: u64 = 1;
/// Invoke transaction, fee-market version.
pub const TX_VERSION_V3: u64 = 3;
/// Query-only transactions (fee estimation, simulation) set this flag on
/// top of the base version and never reach execution.
pub const QUERY_VERSION_FLAG: u64 = 1 << 63;

/// One signer's contribution to the transaction signature: the registry
/// slot it claims plus the raw signature bytes for that credential.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SignatureEntry {
    pub signer_id: u32,
    pub signature: Vec<u8>,
}

/// The full transaction as handed to the account by the host: call list,
/// signature entries and protocol metadata.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct TransactionEnvelope {
    pub calls: Vec<Call>,
    pub signature: Vec<SignatureEntry>,
    pub nonce: u64,
    pub max_fee: u128,
    pub version: u64,
}

impl TransactionEnvelope {
    /// Base version with the query flag stripped.
    pub fn base_version(&self) -> u64 {
        self.version & !QUERY_VERSION_FLAG
    }

    pub fn is_query(&self) -> bool {
        self.version & QUERY_VERSION_FLAG != 0
    }

    /// Transaction hash: SHA-256 over the account address, call list and
    /// protocol metadata. The signature is excluded so every signer signs
    /// the same digest. This is the digest all credential verification and
    /// multisig matching binds to.
    pub fn tx_hash(&self, account: &Address) -> [u8; 32] {
        hash_transaction(account, &self.calls, self.nonce, self.max_fee, self.version)
    }
}

/// Hash transaction parameters without constructing an envelope. Used by
/// the pending-multisig path, where a later signer re-supplies the staged
/// transaction's parameters and the account recomputes the digest.
pub fn hash_transaction(
    account: &Address,
    calls: &[Call],
    nonce: u64,
    max_fee: u128,
    version: u64,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(account.0);
    // Infallible for in-memory writers.
    let calls_bytes = borsh::to_vec(&calls).expect("borsh encoding of calls");
    hasher.update((calls_bytes.len() as u64).to_le_bytes());
    hasher.update(&calls_bytes);
    hasher.update(nonce.to_le_bytes());
    hasher.update(max_fee.to_le_bytes());
    hasher.update((version & !QUERY_VERSION_FLAG).to_le_bytes());
    hasher.finalize().into()
}

/// Result of executing a transaction: per-call return data. A deferred
/// multisig transaction produces an empty response by design.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionResponse {
    pub retdata: Vec<Vec<u8>>,
}

impl ExecutionResponse {
    /// The empty response returned when a transaction is accepted but
    /// staged for further multisig approvals.
    pub fn deferred() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.retdata.is_empty()
    }
}
