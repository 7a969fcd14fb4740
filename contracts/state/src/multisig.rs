//! Multisig threshold coordinator state.

use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::StateError;
use crate::signer::SignerId;

/// A staged transaction expires only once BOTH windows have elapsed;
/// either dimension alone never discards it.
pub const PENDING_TXN_EXPIRY_SEC: u64 = 300;
pub const PENDING_TXN_EXPIRY_BLOCKS: u64 = 5;

/// A partially-approved transaction waiting for more signers. Only the
/// digest of the transaction parameters is kept; later approvals
/// re-supply the parameters and must hash to the same digest.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PendingMultisigTransaction {
    pub tx_hash: [u8; 32],
    pub nonce: u64,
    pub max_fee: u128,
    pub version: u64,
    /// Distinct signers that have approved so far.
    pub signers: BTreeSet<SignerId>,
    pub created_at_sec: u64,
    pub created_at_block: u64,
}

impl PendingMultisigTransaction {
    pub fn is_expired(&self, now_sec: u64, now_block: u64) -> bool {
        now_sec.saturating_sub(self.created_at_sec) > PENDING_TXN_EXPIRY_SEC
            && now_block.saturating_sub(self.created_at_block) >= PENDING_TXN_EXPIRY_BLOCKS
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default)]
pub struct MultisigState {
    num_signers: u32,
    pending: Option<PendingMultisigTransaction>,
}

impl MultisigState {
    pub fn num_signers(&self) -> u32 {
        self.num_signers
    }

    pub fn is_enabled(&self) -> bool {
        self.num_signers > 0
    }

    /// Configure the threshold. `num_signers == 0` disables multisig;
    /// enabling requires a threshold of at least two that the account's
    /// signer set can actually reach.
    pub fn set(&mut self, num_signers: u32, num_account_signers: u32) -> Result<(), StateError> {
        if num_signers == 0 {
            self.disable();
            return Ok(());
        }
        if num_signers < 2 || num_signers > num_account_signers {
            return Err(StateError::UnsupportedMultisigConfiguration);
        }
        self.num_signers = num_signers;
        Ok(())
    }

    /// Drop the threshold and any partially-approved transaction.
    pub fn disable(&mut self) {
        self.num_signers = 0;
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&PendingMultisigTransaction> {
        self.pending.as_ref()
    }

    /// The pending transaction, unless it has expired.
    pub fn live_pending(&self, now_sec: u64, now_block: u64) -> Option<&PendingMultisigTransaction> {
        self.pending
            .as_ref()
            .filter(|p| !p.is_expired(now_sec, now_block))
    }

    /// Validation-phase check. Returns `(valid, in_multisig_mode)`: with
    /// multisig off every transaction is trivially valid; with it on, a
    /// transaction is valid unless it matches the staged one without
    /// bringing any new approver. A different candidate is always valid,
    /// since staging it overrides the old record.
    pub fn multisig_validate(
        &self,
        tx_hash: &[u8; 32],
        approvers: &[SignerId],
        now_sec: u64,
        now_block: u64,
    ) -> (bool, bool) {
        if !self.is_enabled() {
            return (true, false);
        }
        match self.live_pending(now_sec, now_block) {
            Some(p) if &p.tx_hash == tx_hash => {
                let adds_new = approvers.iter().any(|id| !p.signers.contains(id));
                (adds_new, true)
            },
            _ => (true, true),
        }
    }

    /// Execution-phase coordination. Returns `true` when the transaction
    /// is deferred: it was staged (or updated with the new approvals) and
    /// the caller must return an empty response without dispatching.
    /// Returns `false` once the threshold is satisfied; the pending
    /// record is cleared and execution proceeds.
    pub fn multisig_execute(
        &mut self,
        tx_hash: &[u8; 32],
        nonce: u64,
        max_fee: u128,
        version: u64,
        approvers: &[SignerId],
        now_sec: u64,
        now_block: u64,
    ) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let threshold = self.num_signers;
        if let Some(p) = self.pending.as_mut() {
            if !p.is_expired(now_sec, now_block) && &p.tx_hash == tx_hash {
                // Same candidate resubmitted: merge the new approvals
                // into the staged record, keeping its expiry clock.
                p.signers.extend(approvers.iter().copied());
                let done = p.signers.len() as u32 >= threshold;
                if done {
                    self.pending = None;
                    return false;
                }
                return true;
            }
        }
        if approvers.len() as u32 >= threshold {
            self.pending = None;
            return false;
        }
        // Stage or override. A new candidate replaces whatever was
        // staged before; earlier approvals for a different transaction
        // do not carry over.
        self.pending = Some(PendingMultisigTransaction {
            tx_hash: *tx_hash,
            nonce,
            max_fee,
            version,
            signers: approvers.iter().copied().collect(),
            created_at_sec: now_sec,
            created_at_block: now_block,
        });
        true
    }

    /// Out-of-band approval of the staged transaction. Every signer may
    /// approve at most once; parameters must match the staged digest
    /// exactly. Returns `true` when this approval completes the
    /// transaction (pending record cleared, caller dispatches it).
    pub fn sign_pending(
        &mut self,
        tx_hash: &[u8; 32],
        approvers: &[SignerId],
        now_sec: u64,
        now_block: u64,
    ) -> Result<bool, StateError> {
        if approvers.is_empty() {
            return Err(StateError::NoApprovers);
        }
        let threshold = self.num_signers;
        let pending = match self.pending.as_mut() {
            Some(p) if !p.is_expired(now_sec, now_block) => p,
            _ => return Err(StateError::NoPendingTransaction),
        };
        if &pending.tx_hash != tx_hash {
            return Err(StateError::PendingTransactionMismatch);
        }
        if approvers.iter().all(|id| pending.signers.contains(id)) {
            return Err(StateError::SignerAlreadySigned);
        }
        pending.signers.extend(approvers.iter().copied());
        if pending.signers.len() as u32 >= threshold {
            self.pending = None;
            return Ok(true);
        }
        Ok(false)
    }
}
