//! The account facade.
//!
//! [`Account`] is the surface a host embeds: the protocol entrypoints
//! (`validate`, `execute`, the deploy/declare variants), the public
//! signature-check view and the read views. All management entrypoints
//! are reachable only through the account's own validated execution.

use vigil_assertions::{check_caller, check_fee_within};
use vigil_interface::{
    Call, ExecutionResponse, Host, SignatureEntry, TransactionEnvelope,
};
use vigil_state::{
    AccountState, DeferredRequest, DisableMultisig, IndexedSigner, PendingMultisigTransaction,
    RemoveSigner, SignerId,
};

use crate::constants::DEFAULT_EXECUTION_TIME_DELAY_SEC;
use crate::error::VigilError;
use crate::{execution, processor, validation};

pub struct Account {
    state: AccountState,
    executing: bool,
}

impl Account {
    /// Create an account controlled by a single seed key, with the
    /// default execution time delay.
    pub fn new(seed_pubkey: [u8; 32]) -> Self {
        Self::with_execution_time_delay(seed_pubkey, DEFAULT_EXECUTION_TIME_DELAY_SEC)
    }

    pub fn with_execution_time_delay(seed_pubkey: [u8; 32], delay_sec: u64) -> Self {
        Self {
            state: AccountState::new(seed_pubkey, delay_sec),
            executing: false,
        }
    }

    pub fn state(&self) -> &AccountState {
        &self.state
    }

    /// Protocol pre-execution validation of an invoke transaction.
    /// Housekeeping (deferred-request maturation) commits even when the
    /// transaction is rejected.
    pub fn validate<H: Host>(
        &mut self,
        host: &H,
        env: &TransactionEnvelope,
    ) -> Result<(), VigilError> {
        validation::validate_transaction(&mut self.state, host, env)
    }

    /// Deploy-transaction validation: same signer-mode rules, no calls.
    pub fn validate_deploy<H: Host>(
        &mut self,
        host: &H,
        tx_hash: &[u8; 32],
        signature: &[SignatureEntry],
    ) -> Result<(), VigilError> {
        validation::validate_signature(&mut self.state, host, tx_hash, signature)
    }

    /// Declare-transaction validation: same signer-mode rules, no calls.
    pub fn validate_declare<H: Host>(
        &mut self,
        host: &H,
        tx_hash: &[u8; 32],
        signature: &[SignatureEntry],
    ) -> Result<(), VigilError> {
        validation::validate_signature(&mut self.state, host, tx_hash, signature)
    }

    /// Execute a validated transaction. A failed execution leaves no
    /// partial state behind.
    pub fn execute<H: Host>(
        &mut self,
        host: &mut H,
        env: &TransactionEnvelope,
    ) -> Result<ExecutionResponse, VigilError> {
        if self.executing || host.caller() == host.account_address() {
            return Err(VigilError::ReentrancyDenied);
        }
        self.executing = true;
        let snapshot = self.state.clone();
        let result = execution::execute_transaction(&mut self.state, host, env);
        if result.is_err() {
            self.state = snapshot;
        }
        self.executing = false;
        result
    }

    /// Direct management entrypoint, for hosts that route contract calls
    /// to the account. Only the account itself may call in.
    pub fn handle_call<H: Host>(
        &mut self,
        host: &mut H,
        call: &Call,
    ) -> Result<Vec<u8>, VigilError> {
        check_caller(
            &host.caller(),
            &host.account_address(),
            VigilError::PrivilegeDenied,
        )?;
        let snapshot = self.state.clone();
        let result = processor::process_call(&mut self.state, host, call, &[]);
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }

    /// Public signature-check view. `Ok(false)` means the signature
    /// simply does not verify; malformed layouts and unknown signers are
    /// errors. Evaluated against the post-maturation signer set.
    pub fn is_valid_signature<H: Host>(
        &self,
        host: &H,
        hash: &[u8; 32],
        signature: &[SignatureEntry],
    ) -> Result<bool, VigilError> {
        let mut st = self.state.clone();
        match validation::validate_signature(&mut st, host, hash, signature) {
            Ok(()) => Ok(true),
            Err(VigilError::AuthorizationDenied) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Signers as of `now`, with any matured deferred removal applied.
    pub fn get_signers(&self, now: u64) -> Vec<IndexedSigner> {
        let mut st = self.state.clone();
        st.apply_elapsed_etd_requests(now);
        st.registry.get_signers()
    }

    /// One signer by slot id as of `now`, with any matured deferred
    /// removal applied.
    pub fn get_signer(&self, id: SignerId, now: u64) -> Option<IndexedSigner> {
        let mut st = self.state.clone();
        st.apply_elapsed_etd_requests(now);
        st.registry.get_signer(id).map(|model| IndexedSigner {
            id,
            model: model.clone(),
        })
    }

    /// Multisig threshold as of `now`, with any matured deferred disable
    /// applied.
    pub fn get_multisig_num_signers(&self, now: u64) -> u32 {
        let mut st = self.state.clone();
        st.apply_elapsed_etd_requests(now);
        st.multisig.num_signers()
    }

    pub fn get_pending_multisig_transaction(
        &self,
        now_sec: u64,
        now_block: u64,
    ) -> Option<PendingMultisigTransaction> {
        self.state.multisig.live_pending(now_sec, now_block).cloned()
    }

    pub fn get_deferred_remove_signer_req(&self) -> Option<DeferredRequest<RemoveSigner>> {
        self.state.deferred_remove_signer
    }

    pub fn get_deferred_disable_multisig_req(&self) -> Option<DeferredRequest<DisableMultisig>> {
        self.state.deferred_disable_multisig
    }

    pub fn get_execution_time_delay(&self) -> u64 {
        self.state.execution_time_delay_sec
    }
}

/// Side-effect-free fee assertion for off-chain tooling: rejects an
/// envelope committing to more fee than the caller expects.
pub fn assert_max_fee(
    env: &TransactionEnvelope,
    expected_max_fee: u128,
) -> Result<(), VigilError> {
    check_fee_within(env.max_fee, expected_max_fee, VigilError::FeeExceedsExpected)
}
