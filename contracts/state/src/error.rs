//! State-level errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("signer not found")]
    SignerNotFound,

    #[error("cannot remove seed signer")]
    SeedSignerProtected,

    #[error("signer kind not allowed in current mode")]
    ModeConflict,

    #[error("signer already exists")]
    DuplicateSigner,

    #[error("unsupported number of signers in set_multisig")]
    UnsupportedMultisigConfiguration,

    #[error("no pending transaction to sign")]
    NoPendingTransaction,

    #[error("pending transaction parameters mismatch")]
    PendingTransactionMismatch,

    #[error("multisig signer can only sign once")]
    SignerAlreadySigned,

    #[error("no approving signer supplied")]
    NoApprovers,

    #[error("a deferred request is already pending")]
    DeferredRequestPending,

    #[error("no deferred request to cancel")]
    NoDeferredRequest,

    #[error("invalid signature layout")]
    InvalidSignatureLayout,
}
