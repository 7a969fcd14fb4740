//! Program-level errors.
//!
//! Policy checks that live in the state crate surface through the
//! transparent `State` variant; everything the program layer decides on
//! its own gets a dedicated variant so hosts and tests can match on the
//! exact rejection.

use thiserror::Error;
use vigil_interface::HostError;
use vigil_state::StateError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VigilError {
    /// A resolved signer's signature did not verify against its credential.
    #[error("signature verification failed")]
    AuthorizationDenied,

    #[error("entrypoint is restricted to the account itself")]
    PrivilegeDenied,

    #[error("reentrant execution rejected")]
    ReentrancyDenied,

    #[error("unsupported transaction version {0}")]
    VersionRejected(u64),

    #[error("transaction has no calls")]
    EmptyCallList,

    #[error("invalid combination of calls to self")]
    InvalidCallCombination,

    #[error("max fee exceeds the cap for a staged transaction")]
    FeeExceedsCap,

    #[error("max fee exceeds the expected fee")]
    FeeExceedsExpected,

    #[error("daily transaction limit exceeded")]
    DailyTxnLimitExceeded,

    /// With a stronger signer registered, the seed key alone may only
    /// start the time-delayed recovery entrypoints.
    #[error("seed signer cannot sign this transaction in the current mode")]
    SeedSigningRestricted,

    /// While a transaction is staged, the fallback key alone may keep
    /// approving it but never replace it with a different one.
    #[error("seed signer cannot override pending transactions")]
    SeedCannotOverridePending,

    #[error("multisig must stay enabled while multiple external co-signers are registered")]
    MultisigRequiredByMode,

    #[error("signer count argument does not match registry state")]
    InconsistentSignerCount,

    #[error("removal would leave fewer signers than the multisig threshold")]
    ThresholdUnsatisfiable,

    #[error("malformed instruction calldata")]
    InvalidInstructionData,

    #[error("calldata does not match call selector")]
    SelectorMismatch,

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Host(#[from] HostError),
}
