//! Management instruction dispatch.

use tracing::debug;
use vigil_interface::{Call, Host};
use vigil_state::{AccountState, SignerId};

use crate::actions;
use crate::error::VigilError;
use crate::instruction::AccountInstruction;

/// Decode and route one management self-call. Callers have already
/// established that the call targets the account itself; `approvers` are
/// the envelope signers, consumed only by the pending-signature path.
pub fn process_call<H: Host>(
    state: &mut AccountState,
    host: &mut H,
    call: &Call,
    approvers: &[SignerId],
) -> Result<Vec<u8>, VigilError> {
    let instruction = AccountInstruction::unpack(&call.calldata)?;
    if instruction.selector() != call.selector {
        return Err(VigilError::SelectorMismatch);
    }
    debug!(entrypoint = instruction.entrypoint(), "processing management call");

    match instruction {
        AccountInstruction::AddSigner { model } => actions::process_add_signer(state, model),
        AccountInstruction::AddExternalAccountSigners {
            addresses,
            multisig_threshold,
        } => actions::process_add_external_account_signers(state, &addresses, multisig_threshold),
        AccountInstruction::RemoveExternalAccountSigners { signer_ids } => {
            actions::process_remove_external_account_signers(state, &signer_ids)
        },
        AccountInstruction::SwapSigners { remove_id, model } => {
            actions::process_swap_signers(state, SignerId(remove_id), model)
        },
        AccountInstruction::RemoveSigner { signer_id } => {
            actions::process_remove_signer(state, SignerId(signer_id))
        },
        AccountInstruction::RemoveSignerWithEtd { signer_id } => {
            actions::process_remove_signer_with_etd(state, host, SignerId(signer_id))
        },
        AccountInstruction::CancelDeferredRemoveSignerReq { signer_id } => {
            actions::process_cancel_deferred_remove_signer_req(state, SignerId(signer_id))
        },
        AccountInstruction::SetMultisig { num_signers } => {
            actions::process_set_multisig(state, num_signers)
        },
        AccountInstruction::DisableMultisig {
            num_ext_account_signers,
        } => actions::process_disable_multisig(state, num_ext_account_signers),
        AccountInstruction::DisableMultisigWithEtd => {
            actions::process_disable_multisig_with_etd(state, host)
        },
        AccountInstruction::CancelDeferredDisableMultisigReq => {
            actions::process_cancel_deferred_disable_multisig_req(state)
        },
        AccountInstruction::SignPendingMultisigTransaction {
            calls,
            nonce,
            max_fee,
            version,
        } => actions::process_sign_pending_multisig_transaction(
            state, host, &calls, nonce, max_fee, version, approvers,
        ),
    }
}
