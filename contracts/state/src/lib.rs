//! Vigil State
//!
//! Persistent state of one account instance: the signer registry, the
//! multisig coordinator state, outstanding deferred requests and the
//! per-signer usage counters. The aggregate [`AccountState`] owns the
//! cross-component invariants (removing a signer force-disables multisig,
//! maturation housekeeping touches both subsystems).

pub mod deferred;
pub mod error;
pub mod limits;
pub mod multisig;
pub mod registry;
pub mod signer;

pub use deferred::{DeferredRequest, DisableMultisig, RemoveSigner};
pub use error::StateError;
pub use limits::DailyUsage;
pub use multisig::{MultisigState, PendingMultisigTransaction};
pub use registry::{ExtensionMode, ResolvedSigner, SignerRegistry};
pub use signer::{IndexedSigner, SignerId, SignerKind, SignerModel};

use borsh::{BorshDeserialize, BorshSerialize};

/// Complete persistent state of one account.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct AccountState {
    pub registry: SignerRegistry,
    pub multisig: MultisigState,
    pub deferred_remove_signer: Option<DeferredRequest<RemoveSigner>>,
    pub deferred_disable_multisig: Option<DeferredRequest<DisableMultisig>>,
    pub usage: DailyUsage,
    /// Execution time delay in seconds, applied to every deferred request.
    /// Set at account creation, read-only to the authorization core.
    pub execution_time_delay_sec: u64,
}

impl AccountState {
    pub fn new(seed_pubkey: [u8; 32], execution_time_delay_sec: u64) -> Self {
        Self {
            registry: SignerRegistry::new(seed_pubkey),
            multisig: MultisigState::default(),
            deferred_remove_signer: None,
            deferred_disable_multisig: None,
            usage: DailyUsage::default(),
            execution_time_delay_sec,
        }
    }

    /// Total logical account signers: external co-signers count once,
    /// a hardware signer counts twice (device key + seed fallback).
    pub fn account_signer_count(&self) -> u32 {
        match self.registry.mode() {
            ExtensionMode::None => 1,
            ExtensionMode::Hardware { count } => 2 * count,
            ExtensionMode::ExternalAccount { count } => count,
        }
    }

    /// Housekeeping: apply both deferred request kinds if their ready
    /// timestamps have passed. Idempotent; runs at the start of every
    /// validation so later reads in the same transaction see
    /// post-maturation state.
    pub fn apply_elapsed_etd_requests(&mut self, now: u64) {
        if let Some(req) = self.deferred_remove_signer.take() {
            if req.is_due(now) {
                // A matured removal is unconditional; the request was
                // validated when scheduled.
                let _ = self.remove_signer_forced(req.payload.signer_id);
            } else {
                self.deferred_remove_signer = Some(req);
            }
        }
        if let Some(req) = self.deferred_disable_multisig.take() {
            if req.is_due(now) {
                self.multisig.disable();
            } else {
                self.deferred_disable_multisig = Some(req);
            }
        }
    }

    /// Immediate signer removal. Losing a signer collapses the account
    /// below any multisig threshold, so multisig is force-disabled as a
    /// side effect.
    pub fn remove_signer_forced(&mut self, id: SignerId) -> Result<(), StateError> {
        self.registry.remove_signer(id)?;
        self.usage.forget(id);
        self.multisig.disable();
        self.deferred_disable_multisig = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::SignerModel;

    fn state() -> AccountState {
        AccountState::new([1u8; 32], 3600)
    }

    fn hardware_model() -> SignerModel {
        SignerModel::Secp256r1 {
            pubkey_x: [2u8; 32],
            pubkey_y: [3u8; 32],
        }
    }

    #[test]
    fn test_account_signer_count_hardware_counts_twice() {
        let mut st = state();
        assert_eq!(st.account_signer_count(), 1);
        st.registry.add_signer(hardware_model()).unwrap();
        assert_eq!(st.account_signer_count(), 2);
    }

    #[test]
    fn test_forced_removal_disables_multisig() {
        let mut st = state();
        let id = st.registry.add_signer(hardware_model()).unwrap();
        st.multisig.set(2, 2).unwrap();
        st.remove_signer_forced(id).unwrap();
        assert_eq!(st.multisig.num_signers(), 0);
        assert!(st.registry.get_signer(id).is_none());
    }

    #[test]
    fn test_maturation_is_idempotent() {
        let mut st = state();
        let id = st.registry.add_signer(hardware_model()).unwrap();
        st.deferred_remove_signer = Some(DeferredRequest::schedule(
            100,
            st.execution_time_delay_sec,
            RemoveSigner { signer_id: id },
        ));
        let ready_at = st.deferred_remove_signer.as_ref().unwrap().ready_at;

        st.apply_elapsed_etd_requests(ready_at - 1);
        assert!(st.registry.get_signer(id).is_some());

        st.apply_elapsed_etd_requests(ready_at);
        assert!(st.registry.get_signer(id).is_none());
        assert!(st.deferred_remove_signer.is_none());

        // Second pass has nothing left to do.
        st.apply_elapsed_etd_requests(ready_at + 10);
        assert!(st.deferred_remove_signer.is_none());
    }
}
