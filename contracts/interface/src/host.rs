//! Host environment traits.
//!
//! The account core never reads a clock or performs an outbound call
//! directly; everything environmental comes through these traits. Hosts
//! are expected to serialize transactions against one account, so the
//! traits take `&mut self` only where state can change.

use thiserror::Error;

use crate::call::{Address, Call};
use crate::verify::SignatureVerifier;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("call to contract failed: {0}")]
    CallFailed(String),
    #[error("target contract not found")]
    ContractNotFound,
}

/// Execution-context facts the host provides for the current transaction.
pub trait HostEnv {
    /// Identity of the direct caller of the current entrypoint. Equals
    /// [`HostEnv::account_address`] for self-calls.
    fn caller(&self) -> Address;

    /// Address of the account instance being executed.
    fn account_address(&self) -> Address;

    /// Current block timestamp, seconds.
    fn block_timestamp(&self) -> u64;

    /// Current block number.
    fn block_number(&self) -> u64;
}

/// Outbound call dispatch. Only reached from the execution phase, after
/// the full validation pipeline accepted the transaction.
pub trait CallDispatcher {
    fn dispatch(&mut self, call: &Call) -> Result<Vec<u8>, HostError>;
}

/// The complete host capability set the program is written against.
pub trait Host: HostEnv + CallDispatcher + SignatureVerifier {}

impl<T: HostEnv + CallDispatcher + SignatureVerifier> Host for T {}
