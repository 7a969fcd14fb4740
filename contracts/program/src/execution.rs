//! Transaction execution.
//!
//! Runs after the validation pipeline accepted the envelope. Ordering
//! matters: the version guard first, then signer-side bookkeeping, then
//! the multisig stage-or-execute decision, and only then any outbound
//! dispatch.

use tracing::debug;
use vigil_assertions::check_version_supported;
use vigil_interface::{Call, ExecutionResponse, Host, TransactionEnvelope};
use vigil_state::{AccountState, ExtensionMode, SignerId};

use crate::constants::EXT_ACCOUNT_DAILY_TXN_LIMIT;
use crate::error::VigilError;
use crate::processor;
use crate::validation::is_exempt_self_call;

pub fn execute_transaction<H: Host>(
    state: &mut AccountState,
    host: &mut H,
    env: &TransactionEnvelope,
) -> Result<ExecutionResponse, VigilError> {
    check_version_supported(env.version, VigilError::VersionRejected(env.version))?;
    if env.is_query() {
        // Query versions exist for fee estimation and never execute.
        return Err(VigilError::VersionRejected(env.version));
    }

    let now = host.block_timestamp();
    let block = host.block_number();
    let resolved = state.registry.resolve_signers_from_sig(&env.signature)?;
    let ids: Vec<SignerId> = resolved.iter().map(|r| r.id).collect();

    // External co-signers spend one daily slot per driven transaction,
    // staged or not.
    if matches!(state.registry.mode(), ExtensionMode::ExternalAccount { .. }) {
        for id in &ids {
            if !state.usage.within_limit(*id, now, EXT_ACCOUNT_DAILY_TXN_LIMIT) {
                return Err(VigilError::DailyTxnLimitExceeded);
            }
        }
        for id in &ids {
            state.usage.consume(*id, now);
        }
    }

    if !is_exempt_self_call(host, env) {
        let tx_hash = env.tx_hash(&host.account_address());
        let deferred = state.multisig.multisig_execute(
            &tx_hash,
            env.nonce,
            env.max_fee,
            env.version,
            &ids,
            now,
            block,
        );
        if deferred {
            debug!(
                tx_hash = %hex::encode(tx_hash),
                "transaction staged for further approvals"
            );
            return Ok(ExecutionResponse::deferred());
        }
    }

    dispatch_calls(state, host, &env.calls, &ids)
}

/// Dispatch a validated call list, routing self-calls through the
/// management processor and everything else through the host.
pub(crate) fn dispatch_calls<H: Host>(
    state: &mut AccountState,
    host: &mut H,
    calls: &[Call],
    approvers: &[SignerId],
) -> Result<ExecutionResponse, VigilError> {
    let account = host.account_address();
    let mut retdata = Vec::with_capacity(calls.len());
    for call in calls {
        let ret = if call.to == account {
            processor::process_call(state, host, call, approvers)?
        } else {
            host.dispatch(call)?
        };
        retdata.push(ret);
    }
    Ok(ExecutionResponse { retdata })
}
