//! External co-signer batch actions.

use tracing::info;
use vigil_interface::Address;
use vigil_state::{AccountState, ExtensionMode, SignerId};

use super::encode;
use crate::error::VigilError;

/// Batch-add external co-signers, coupling the multisig threshold in the
/// same operation: an account controlled by several co-signers must never
/// exist without a threshold.
pub fn process_add_external_account_signers(
    state: &mut AccountState,
    addresses: &[Address],
    multisig_threshold: u32,
) -> Result<Vec<u8>, VigilError> {
    let current = match state.registry.mode() {
        ExtensionMode::ExternalAccount { count } => count,
        _ => 0,
    };
    let total = current + addresses.len() as u32;
    if total >= 2 && multisig_threshold == 0 {
        return Err(VigilError::MultisigRequiredByMode);
    }
    let ids = state.registry.add_external_account_signers(addresses)?;
    state
        .multisig
        .set(multisig_threshold, state.account_signer_count())?;
    info!(
        added = ids.len(),
        threshold = multisig_threshold,
        "external co-signers added"
    );
    Ok(encode(&ids.iter().map(|id| id.0).collect::<Vec<u32>>()))
}

/// Batch-remove external co-signers. Survivors must still be able to meet
/// the active threshold; removing the last co-signer returns the account
/// to seed-only mode and drops multisig entirely.
pub fn process_remove_external_account_signers(
    state: &mut AccountState,
    signer_ids: &[u32],
) -> Result<Vec<u8>, VigilError> {
    let ids: Vec<SignerId> = signer_ids.iter().map(|&v| SignerId(v)).collect();
    for (i, id) in ids.iter().enumerate() {
        if ids[..i].contains(id) {
            return Err(VigilError::InvalidInstructionData);
        }
    }
    let current = match state.registry.mode() {
        ExtensionMode::ExternalAccount { count } => count,
        _ => 0,
    };
    let remaining = current.saturating_sub(ids.len() as u32);
    let threshold = state.multisig.num_signers();
    if threshold > 0 && remaining > 0 && remaining < threshold {
        return Err(VigilError::ThresholdUnsatisfiable);
    }

    state.registry.remove_external_account_signers(&ids)?;
    for id in &ids {
        state.usage.forget(*id);
    }
    if remaining == 0 {
        state.multisig.disable();
    }
    info!(removed = ids.len(), remaining, "external co-signers removed");
    Ok(Vec::new())
}
