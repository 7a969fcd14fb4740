//! Multisig configuration and pending-transaction actions.

use tracing::{debug, info};
use vigil_assertions::check_eq_count;
use vigil_interface::{hash_transaction, Call, Host};
use vigil_state::{AccountState, ExtensionMode, SignerId};

use super::encode;
use crate::error::VigilError;
use crate::execution;

pub fn process_set_multisig(
    state: &mut AccountState,
    num_signers: u32,
) -> Result<Vec<u8>, VigilError> {
    state
        .multisig
        .set(num_signers, state.account_signer_count())?;
    info!(num_signers, "multisig threshold set");
    Ok(Vec::new())
}

/// Immediate disable. Rejected while two or more external co-signers are
/// registered: such an account must keep a threshold. The caller passes
/// the co-signer count it observed so a racing configuration change fails
/// loudly instead of silently applying.
pub fn process_disable_multisig(
    state: &mut AccountState,
    num_ext_account_signers: u32,
) -> Result<Vec<u8>, VigilError> {
    let ext_count = match state.registry.mode() {
        ExtensionMode::ExternalAccount { count } => count,
        _ => 0,
    };
    check_eq_count(
        num_ext_account_signers,
        ext_count,
        VigilError::InconsistentSignerCount,
    )?;
    if ext_count >= 2 {
        return Err(VigilError::MultisigRequiredByMode);
    }
    state.multisig.disable();
    info!("multisig disabled");
    Ok(Vec::new())
}

/// Out-of-band approval of the staged transaction. The approving signer
/// re-supplies the staged parameters; the recomputed digest must match
/// the staged one. Meeting the threshold dispatches the staged calls
/// immediately.
#[allow(clippy::too_many_arguments)]
pub fn process_sign_pending_multisig_transaction<H: Host>(
    state: &mut AccountState,
    host: &mut H,
    calls: &[Call],
    nonce: u64,
    max_fee: u128,
    version: u64,
    approvers: &[SignerId],
) -> Result<Vec<u8>, VigilError> {
    let tx_hash = hash_transaction(&host.account_address(), calls, nonce, max_fee, version);
    let completed = state.multisig.sign_pending(
        &tx_hash,
        approvers,
        host.block_timestamp(),
        host.block_number(),
    )?;
    if !completed {
        debug!("approval recorded, threshold not yet met");
        return Ok(Vec::new());
    }
    info!(
        tx_hash = %hex::encode(tx_hash),
        "threshold met, dispatching staged transaction"
    );
    let response = execution::dispatch_calls(state, host, calls, &[])?;
    Ok(encode(&response))
}
