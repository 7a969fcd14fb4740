//! Per-entrypoint action handlers.
//!
//! One handler per management entrypoint, invoked by the processor after
//! instruction decode. Handlers return borsh-encoded retdata.

mod deferred;
mod external;
mod multisig;
mod signers;

pub use deferred::{
    process_cancel_deferred_disable_multisig_req, process_cancel_deferred_remove_signer_req,
    process_disable_multisig_with_etd, process_remove_signer_with_etd,
};
pub use external::{process_add_external_account_signers, process_remove_external_account_signers};
pub use multisig::{
    process_disable_multisig, process_set_multisig, process_sign_pending_multisig_transaction,
};
pub use signers::{process_add_signer, process_remove_signer, process_swap_signers};

use borsh::BorshSerialize;

/// Encode a handler return value as retdata.
pub(crate) fn encode<T: BorshSerialize>(value: &T) -> Vec<u8> {
    // Infallible for in-memory writers.
    borsh::to_vec(value).expect("borsh encoding of retdata")
}
