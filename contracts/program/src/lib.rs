//! Vigil account program.
//!
//! The authorization core of a programmable account: a signer registry
//! with seed, hardware and external-account credentials, an N-of-M
//! multisig coordinator with staged pending transactions, time-delayed
//! deferred requests as the recovery escape hatch, and a two-phase
//! validate/execute pipeline. Everything environmental (clock, caller,
//! outbound calls, signature schemes) is reached through the host traits
//! in `vigil-interface`.

pub mod account;
pub mod actions;
pub mod constants;
pub mod error;
pub mod execution;
pub mod instruction;
pub mod processor;
pub mod validation;

pub use account::{assert_max_fee, Account};
pub use error::VigilError;
pub use instruction::{entrypoint, AccountInstruction};
