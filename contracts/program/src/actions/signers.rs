//! Signer registry actions.

use tracing::info;
use vigil_state::{AccountState, SignerId, SignerModel};

use super::encode;
use crate::error::VigilError;

pub fn process_add_signer(
    state: &mut AccountState,
    model: SignerModel,
) -> Result<Vec<u8>, VigilError> {
    let id = state.registry.add_signer(model)?;
    info!(%id, "signer added");
    Ok(encode(&id.0))
}

/// Atomic remove+add key rotation. Signer count is unchanged, so the
/// multisig configuration survives.
pub fn process_swap_signers(
    state: &mut AccountState,
    remove_id: SignerId,
    model: SignerModel,
) -> Result<Vec<u8>, VigilError> {
    let new_id = state.registry.swap_signers(remove_id, model)?;
    state.usage.forget(remove_id);
    info!(old = %remove_id, new = %new_id, "signer swapped");
    Ok(encode(&new_id.0))
}

/// Immediate removal. Only reachable with the stronger signer's own
/// approval; the delay-free path for a cooperating signer.
pub fn process_remove_signer(
    state: &mut AccountState,
    id: SignerId,
) -> Result<Vec<u8>, VigilError> {
    state.remove_signer_forced(id)?;
    // A deferred removal of the same signer has nothing left to do.
    if matches!(&state.deferred_remove_signer, Some(req) if req.payload.signer_id == id) {
        state.deferred_remove_signer = None;
    }
    info!(%id, "signer removed");
    Ok(Vec::new())
}
