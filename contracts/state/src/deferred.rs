//! Time-delayed request primitive.
//!
//! Every hard-to-reverse configuration change (losing a signer, losing
//! multisig protection) passes through the same pattern: schedule with a
//! maturity timestamp, expose for inspection and cancellation, apply
//! exactly once when due. The waiting window gives the legitimate owner
//! time to notice and cancel before a stolen key strips protections.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::signer::SignerId;

/// Payload of a deferred signer removal.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoveSigner {
    pub signer_id: SignerId,
}

/// Payload of a deferred multisig disable.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DisableMultisig;

/// A scheduled change waiting out its execution time delay. At most one
/// request per payload kind is outstanding at a time.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeferredRequest<P> {
    pub payload: P,
    /// Timestamp at which the request matures, seconds.
    pub ready_at: u64,
}

impl<P> DeferredRequest<P> {
    pub fn schedule(now: u64, delay_sec: u64, payload: P) -> Self {
        Self {
            payload,
            ready_at: now.saturating_add(delay_sec),
        }
    }

    pub fn is_due(&self, now: u64) -> bool {
        self.ready_at <= now
    }
}
