//! Management instruction encoding.
//!
//! A call targeting the account itself carries a borsh-encoded
//! [`AccountInstruction`] as calldata, with the call selector derived from
//! the entrypoint name. The processor decodes the calldata and cross-checks
//! the selector so a call can never smuggle one operation behind another
//! operation's selector.

use borsh::{BorshDeserialize, BorshSerialize};
use vigil_interface::{selector, Address, Call, Selector};
use vigil_state::SignerModel;

use crate::error::VigilError;

/// Canonical entrypoint names for the management surface.
pub mod entrypoint {
    pub const ADD_SIGNER: &str = "add_signer";
    pub const ADD_EXTERNAL_ACCOUNT_SIGNERS: &str = "add_external_account_signers";
    pub const REMOVE_EXTERNAL_ACCOUNT_SIGNERS: &str = "remove_external_account_signers";
    pub const SWAP_SIGNERS: &str = "swap_signers";
    pub const REMOVE_SIGNER: &str = "remove_signer";
    pub const REMOVE_SIGNER_WITH_ETD: &str = "remove_signer_with_etd";
    pub const CANCEL_DEFERRED_REMOVE_SIGNER_REQ: &str = "cancel_deferred_remove_signer_req";
    pub const SET_MULTISIG: &str = "set_multisig";
    pub const DISABLE_MULTISIG: &str = "disable_multisig";
    pub const DISABLE_MULTISIG_WITH_ETD: &str = "disable_multisig_with_etd";
    pub const CANCEL_DEFERRED_DISABLE_MULTISIG_REQ: &str =
        "cancel_deferred_disable_multisig_req";
    pub const SIGN_PENDING_MULTISIG_TRANSACTION: &str = "sign_pending_multisig_transaction";
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum AccountInstruction {
    AddSigner {
        model: SignerModel,
    },
    AddExternalAccountSigners {
        addresses: Vec<Address>,
        multisig_threshold: u32,
    },
    RemoveExternalAccountSigners {
        signer_ids: Vec<u32>,
    },
    SwapSigners {
        remove_id: u32,
        model: SignerModel,
    },
    RemoveSigner {
        signer_id: u32,
    },
    RemoveSignerWithEtd {
        signer_id: u32,
    },
    CancelDeferredRemoveSignerReq {
        signer_id: u32,
    },
    SetMultisig {
        num_signers: u32,
    },
    DisableMultisig {
        num_ext_account_signers: u32,
    },
    DisableMultisigWithEtd,
    CancelDeferredDisableMultisigReq,
    SignPendingMultisigTransaction {
        calls: Vec<Call>,
        nonce: u64,
        max_fee: u128,
        version: u64,
    },
}

impl AccountInstruction {
    pub fn unpack(data: &[u8]) -> Result<Self, VigilError> {
        Self::try_from_slice(data).map_err(|_| VigilError::InvalidInstructionData)
    }

    pub fn entrypoint(&self) -> &'static str {
        match self {
            AccountInstruction::AddSigner { .. } => entrypoint::ADD_SIGNER,
            AccountInstruction::AddExternalAccountSigners { .. } => {
                entrypoint::ADD_EXTERNAL_ACCOUNT_SIGNERS
            },
            AccountInstruction::RemoveExternalAccountSigners { .. } => {
                entrypoint::REMOVE_EXTERNAL_ACCOUNT_SIGNERS
            },
            AccountInstruction::SwapSigners { .. } => entrypoint::SWAP_SIGNERS,
            AccountInstruction::RemoveSigner { .. } => entrypoint::REMOVE_SIGNER,
            AccountInstruction::RemoveSignerWithEtd { .. } => entrypoint::REMOVE_SIGNER_WITH_ETD,
            AccountInstruction::CancelDeferredRemoveSignerReq { .. } => {
                entrypoint::CANCEL_DEFERRED_REMOVE_SIGNER_REQ
            },
            AccountInstruction::SetMultisig { .. } => entrypoint::SET_MULTISIG,
            AccountInstruction::DisableMultisig { .. } => entrypoint::DISABLE_MULTISIG,
            AccountInstruction::DisableMultisigWithEtd => entrypoint::DISABLE_MULTISIG_WITH_ETD,
            AccountInstruction::CancelDeferredDisableMultisigReq => {
                entrypoint::CANCEL_DEFERRED_DISABLE_MULTISIG_REQ
            },
            AccountInstruction::SignPendingMultisigTransaction { .. } => {
                entrypoint::SIGN_PENDING_MULTISIG_TRANSACTION
            },
        }
    }

    pub fn selector(&self) -> Selector {
        selector(self.entrypoint())
    }

    /// Package the instruction as a self-call against `account`.
    pub fn to_call(&self, account: Address) -> Call {
        // Infallible for in-memory writers.
        let calldata = borsh::to_vec(self).expect("borsh encoding of instruction");
        Call::new(account, self.selector(), calldata)
    }
}

/// Entrypoints exempt from the multisig stage-or-execute gate: they
/// either act on the staged transaction itself or start a time-delayed
/// recovery that must never be blockable by a lost co-signer.
pub fn is_multisig_exempt(sel: Selector) -> bool {
    sel == selector(entrypoint::SIGN_PENDING_MULTISIG_TRANSACTION)
        || sel == selector(entrypoint::REMOVE_SIGNER_WITH_ETD)
        || sel == selector(entrypoint::DISABLE_MULTISIG_WITH_ETD)
}

/// Entrypoints the seed signer may still reach alone while a hardware
/// signer is registered.
pub fn is_seed_escape_entrypoint(sel: Selector) -> bool {
    sel == selector(entrypoint::REMOVE_SIGNER_WITH_ETD)
        || sel == selector(entrypoint::DISABLE_MULTISIG_WITH_ETD)
}

/// Whitelisted two-call management combinations. Any other transaction
/// bundling more than one self-call is rejected.
pub fn is_allowed_self_call_pair(first: Selector, second: Selector) -> bool {
    const PAIRS: [(&str, &str); 6] = [
        (entrypoint::ADD_SIGNER, entrypoint::SET_MULTISIG),
        (entrypoint::DISABLE_MULTISIG, entrypoint::REMOVE_SIGNER),
        (
            entrypoint::DISABLE_MULTISIG_WITH_ETD,
            entrypoint::REMOVE_SIGNER_WITH_ETD,
        ),
        (
            entrypoint::CANCEL_DEFERRED_REMOVE_SIGNER_REQ,
            entrypoint::CANCEL_DEFERRED_DISABLE_MULTISIG_REQ,
        ),
        (
            entrypoint::DISABLE_MULTISIG,
            entrypoint::CANCEL_DEFERRED_REMOVE_SIGNER_REQ,
        ),
        (
            entrypoint::CANCEL_DEFERRED_REMOVE_SIGNER_REQ,
            entrypoint::SET_MULTISIG,
        ),
    ];
    PAIRS
        .iter()
        .any(|(a, b)| first == selector(a) && second == selector(b))
}
