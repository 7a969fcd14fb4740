//! Vigil Interface
//!
//! Wire types and host-boundary traits shared between the account program
//! and its host environment: call/transaction envelopes, entrypoint
//! selectors, transaction hashing, and the capabilities the host provides
//! (clock, caller identity, call dispatch, signature verification).

pub mod call;
pub mod envelope;
pub mod host;
pub mod verify;

pub use call::{selector, Address, Call, Selector};
pub use envelope::{
    hash_transaction, ExecutionResponse, SignatureEntry, TransactionEnvelope, QUERY_VERSION_FLAG,
    TX_VERSION_V1, TX_VERSION_V3,
};
pub use host::{CallDispatcher, Host, HostEnv, HostError};
pub use verify::{SignatureVerifier, StandardVerifier};
