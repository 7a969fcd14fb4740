//! Time-delayed (ETD) request actions.
//!
//! The escape hatch for a lost stronger signer: the seed key schedules
//! the change, the waiting window gives the stronger signer time to
//! cancel, and maturation applies it during validation housekeeping.

use tracing::info;
use vigil_interface::Host;
use vigil_state::{AccountState, DeferredRequest, DisableMultisig, RemoveSigner, SignerId, StateError};

use super::encode;
use crate::error::VigilError;

pub fn process_remove_signer_with_etd<H: Host>(
    state: &mut AccountState,
    host: &H,
    id: SignerId,
) -> Result<Vec<u8>, VigilError> {
    if id == SignerId::SEED {
        return Err(StateError::SeedSignerProtected.into());
    }
    if state.registry.get_signer(id).is_none() {
        return Err(StateError::SignerNotFound.into());
    }
    if state.deferred_remove_signer.is_some() {
        return Err(StateError::DeferredRequestPending.into());
    }
    let req = DeferredRequest::schedule(
        host.block_timestamp(),
        state.execution_time_delay_sec,
        RemoveSigner { signer_id: id },
    );
    info!(%id, ready_at = req.ready_at, "deferred signer removal scheduled");
    state.deferred_remove_signer = Some(req);
    Ok(encode(&req.ready_at))
}

pub fn process_cancel_deferred_remove_signer_req(
    state: &mut AccountState,
    id: SignerId,
) -> Result<Vec<u8>, VigilError> {
    match &state.deferred_remove_signer {
        Some(req) if req.payload.signer_id == id => {
            state.deferred_remove_signer = None;
            info!(%id, "deferred signer removal cancelled");
            Ok(Vec::new())
        },
        _ => Err(StateError::NoDeferredRequest.into()),
    }
}

pub fn process_disable_multisig_with_etd<H: Host>(
    state: &mut AccountState,
    host: &H,
) -> Result<Vec<u8>, VigilError> {
    if !state.multisig.is_enabled() {
        return Err(StateError::UnsupportedMultisigConfiguration.into());
    }
    if state.deferred_disable_multisig.is_some() {
        return Err(StateError::DeferredRequestPending.into());
    }
    let req = DeferredRequest::schedule(
        host.block_timestamp(),
        state.execution_time_delay_sec,
        DisableMultisig,
    );
    info!(ready_at = req.ready_at, "deferred multisig disable scheduled");
    state.deferred_disable_multisig = Some(req);
    Ok(encode(&req.ready_at))
}

pub fn process_cancel_deferred_disable_multisig_req(
    state: &mut AccountState,
) -> Result<Vec<u8>, VigilError> {
    if state.deferred_disable_multisig.take().is_none() {
        return Err(StateError::NoDeferredRequest.into());
    }
    info!("deferred multisig disable cancelled");
    Ok(Vec::new())
}
