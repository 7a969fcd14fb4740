//! Transaction validation pipeline.
//!
//! Five ordered steps, all of which must pass: housekeeping, signature
//! resolution, account-level structural checks, multisig validation and
//! signer-mode validation. Housekeeping commits even when a later step
//! rejects, so the post-maturation state is what every later read sees.

use std::collections::BTreeSet;

use tracing::debug;
use vigil_assertions::{check_fee_within, check_version_supported};
use vigil_interface::{Host, SignatureEntry, TransactionEnvelope};
use vigil_state::{
    AccountState, ExtensionMode, ResolvedSigner, SignerId, SignerKind, SignerModel, StateError,
};

use crate::constants::{EXT_ACCOUNT_DAILY_TXN_LIMIT, MAX_EXT_ACCOUNT_SIGNER_VALIDATION_FEE};
use crate::error::VigilError;
use crate::instruction::{is_allowed_self_call_pair, is_multisig_exempt, is_seed_escape_entrypoint};

/// Full validation of an invoke transaction.
pub fn validate_transaction<H: Host>(
    state: &mut AccountState,
    host: &H,
    env: &TransactionEnvelope,
) -> Result<(), VigilError> {
    state.apply_elapsed_etd_requests(host.block_timestamp());

    let resolved = state.registry.resolve_signers_from_sig(&env.signature)?;
    let tx_hash = env.tx_hash(&host.account_address());

    validate_call_structure(state, host, env, &resolved, &tx_hash)?;
    validate_multisig(state, host, env, &resolved, &tx_hash)?;
    validate_signer_modes(state, host, env, &resolved, &tx_hash)?;
    Ok(())
}

/// Signature-only validation, shared by the deploy/declare entrypoints
/// and the public signature-check view. Applies the same mode coverage
/// rules as invoke validation, minus everything call-shaped.
pub fn validate_signature<H: Host>(
    state: &mut AccountState,
    host: &H,
    hash: &[u8; 32],
    signature: &[SignatureEntry],
) -> Result<(), VigilError> {
    state.apply_elapsed_etd_requests(host.block_timestamp());
    let resolved = state.registry.resolve_signers_from_sig(signature)?;
    match state.registry.mode() {
        ExtensionMode::None => {},
        ExtensionMode::Hardware { .. } => {
            // Without a call list there is no escape hatch to grant.
            if !has_kind(&resolved, SignerKind::Secp256r1) {
                return Err(VigilError::SeedSigningRestricted);
            }
        },
        ExtensionMode::ExternalAccount { .. } => {
            check_ext_signer_set(state, host, &resolved)?;
        },
    }
    verify_all(host, &resolved, hash)
}

/// Account-level structural checks: call-list shape, transaction version
/// and the intermediate co-signer fee cap.
fn validate_call_structure<H: Host>(
    state: &AccountState,
    host: &H,
    env: &TransactionEnvelope,
    resolved: &[ResolvedSigner],
    tx_hash: &[u8; 32],
) -> Result<(), VigilError> {
    if env.calls.is_empty() {
        return Err(VigilError::EmptyCallList);
    }
    check_version_supported(env.version, VigilError::VersionRejected(env.version))?;

    let account = host.account_address();
    if env.calls[0].to == account {
        let ok = match env.calls.len() {
            1 => true,
            2 => {
                env.calls[1].to == account
                    && is_allowed_self_call_pair(env.calls[0].selector, env.calls[1].selector)
            },
            _ => false,
        };
        if !ok {
            return Err(VigilError::InvalidCallCombination);
        }
    } else if env.calls.iter().any(|c| c.to == account) {
        // Management calls may not hide behind a leading external call.
        return Err(VigilError::InvalidCallCombination);
    }

    // An external co-signer transaction that will only be staged (it does
    // not meet the threshold on its own) may not commit to a large fee.
    if matches!(state.registry.mode(), ExtensionMode::ExternalAccount { .. })
        && state.multisig.is_enabled()
        && !will_complete_threshold(state, host, resolved, tx_hash)
    {
        check_fee_within(
            env.max_fee,
            MAX_EXT_ACCOUNT_SIGNER_VALIDATION_FEE,
            VigilError::FeeExceedsCap,
        )?;
    }
    Ok(())
}

fn validate_multisig<H: Host>(
    state: &AccountState,
    host: &H,
    env: &TransactionEnvelope,
    resolved: &[ResolvedSigner],
    tx_hash: &[u8; 32],
) -> Result<(), VigilError> {
    if is_exempt_self_call(host, env) {
        return Ok(());
    }
    // A live staged transaction may only be replaced by a stronger
    // signer; the seed alone would otherwise be able to wipe out the
    // legitimate signers' candidate at will.
    if let Some(p) = state
        .multisig
        .live_pending(host.block_timestamp(), host.block_number())
    {
        if &p.tx_hash != tx_hash
            && resolved.iter().all(|r| r.model.kind() == SignerKind::Seed)
        {
            debug!("seed-only envelope tried to replace the staged transaction");
            return Err(VigilError::SeedCannotOverridePending);
        }
    }
    let ids: Vec<SignerId> = resolved.iter().map(|r| r.id).collect();
    let (valid, _in_mode) = state.multisig.multisig_validate(
        tx_hash,
        &ids,
        host.block_timestamp(),
        host.block_number(),
    );
    if !valid {
        debug!("envelope adds no new approval to the staged transaction");
        return Err(VigilError::State(StateError::SignerAlreadySigned));
    }
    Ok(())
}

/// Mode validation, bound to the first call's target and selector.
fn validate_signer_modes<H: Host>(
    state: &AccountState,
    host: &H,
    env: &TransactionEnvelope,
    resolved: &[ResolvedSigner],
    tx_hash: &[u8; 32],
) -> Result<(), VigilError> {
    match state.registry.mode() {
        ExtensionMode::None => {},
        ExtensionMode::Hardware { .. } => {
            // With multisig enabled the seed is an ordinary approver: its
            // transactions only stage until the device key co-approves.
            // Without it, the seed alone may only start the time-delayed
            // recovery entrypoints.
            if !has_kind(resolved, SignerKind::Secp256r1) && !state.multisig.is_enabled() {
                let account = host.account_address();
                let escape = env
                    .calls
                    .iter()
                    .all(|c| c.to == account && is_seed_escape_entrypoint(c.selector));
                if !escape {
                    return Err(VigilError::SeedSigningRestricted);
                }
            }
        },
        ExtensionMode::ExternalAccount { .. } => {
            check_ext_signer_set(state, host, resolved)?;
        },
    }
    verify_all(host, resolved, tx_hash)
}

/// External-account mode signer-set rules: the seed (or any non-co-signer
/// credential) cannot sign, and every co-signer must be within its daily
/// budget.
fn check_ext_signer_set<H: Host>(
    state: &AccountState,
    host: &H,
    resolved: &[ResolvedSigner],
) -> Result<(), VigilError> {
    if resolved
        .iter()
        .any(|r| r.model.kind() != SignerKind::ExternalAccount)
    {
        return Err(VigilError::SeedSigningRestricted);
    }
    let now = host.block_timestamp();
    for r in resolved {
        if !state
            .usage
            .within_limit(r.id, now, EXT_ACCOUNT_DAILY_TXN_LIMIT)
        {
            debug!(signer = %r.id, "daily transaction budget exhausted");
            return Err(VigilError::DailyTxnLimitExceeded);
        }
    }
    Ok(())
}

/// Verify every resolved signature against its credential.
fn verify_all<H: Host>(
    host: &H,
    resolved: &[ResolvedSigner],
    hash: &[u8; 32],
) -> Result<(), VigilError> {
    for r in resolved {
        let ok = match &r.model {
            SignerModel::Seed { pubkey } => host.verify_ed25519(pubkey, hash, &r.signature),
            SignerModel::Secp256r1 { pubkey_x, pubkey_y } => {
                host.verify_secp256r1(pubkey_x, pubkey_y, hash, &r.signature)
            },
            SignerModel::ExternalAccount { address } => {
                host.verify_external_account(address, hash, &r.signature)
            },
        };
        if !ok {
            debug!(signer = %r.id, "signature verification failed");
            return Err(VigilError::AuthorizationDenied);
        }
    }
    Ok(())
}

/// Whether every call in this envelope targets an entrypoint exempt from
/// the multisig stage-or-execute gate. Covers both a lone recovery call
/// and the whitelisted recovery pair.
pub(crate) fn is_exempt_self_call<H: Host>(host: &H, env: &TransactionEnvelope) -> bool {
    let account = host.account_address();
    !env.calls.is_empty()
        && env
            .calls
            .iter()
            .all(|c| c.to == account && is_multisig_exempt(c.selector))
}

/// Whether the staged approvals plus this envelope's signers reach the
/// multisig threshold.
fn will_complete_threshold<H: Host>(
    state: &AccountState,
    host: &H,
    resolved: &[ResolvedSigner],
    tx_hash: &[u8; 32],
) -> bool {
    let mut combined: BTreeSet<SignerId> = resolved.iter().map(|r| r.id).collect();
    if let Some(p) = state
        .multisig
        .live_pending(host.block_timestamp(), host.block_number())
    {
        if &p.tx_hash == tx_hash {
            combined.extend(p.signers.iter().copied());
        }
    }
    combined.len() as u32 >= state.multisig.num_signers()
}

fn has_kind(resolved: &[ResolvedSigner], kind: SignerKind) -> bool {
    resolved.iter().any(|r| r.model.kind() == kind)
}
