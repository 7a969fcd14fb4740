//! Slot-indexed signer registry.
//!
//! Signer records live in an arena addressed by stable small handles.
//! Slot 0 is reserved for the seed signer and never reassigned; removal
//! tombstones the slot so every other handle stays valid forever.

use borsh::{BorshDeserialize, BorshSerialize};
use vigil_interface::{Address, SignatureEntry};

use crate::error::StateError;
use crate::signer::{IndexedSigner, SignerId, SignerKind, SignerModel};

/// Which extension mechanism is active. Hardware and external-account
/// signing have mutually exclusive validation rules, so the registry
/// tracks a single tagged mode instead of two independent flags.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtensionMode {
    None,
    Hardware { count: u32 },
    ExternalAccount { count: u32 },
}

/// A signature entry bound to the registry slot it claims.
#[derive(Clone, Debug)]
pub struct ResolvedSigner {
    pub id: SignerId,
    pub model: SignerModel,
    pub signature: Vec<u8>,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct SignerRegistry {
    slots: Vec<Option<SignerModel>>,
    mode: ExtensionMode,
}

impl SignerRegistry {
    pub fn new(seed_pubkey: [u8; 32]) -> Self {
        Self {
            slots: vec![Some(SignerModel::Seed {
                pubkey: seed_pubkey,
            })],
            mode: ExtensionMode::None,
        }
    }

    pub fn mode(&self) -> ExtensionMode {
        self.mode
    }

    pub fn get_signer(&self, id: SignerId) -> Option<&SignerModel> {
        self.slots.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    pub fn get_signers(&self) -> Vec<IndexedSigner> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                slot.as_ref().map(|model| IndexedSigner {
                    id: SignerId(idx as u32),
                    model: model.clone(),
                })
            })
            .collect()
    }

    /// Add a signer, enforcing the mode exclusivity rules. Returns the
    /// new slot handle.
    pub fn add_signer(&mut self, model: SignerModel) -> Result<SignerId, StateError> {
        match (&model, self.mode) {
            // The seed signer exists exactly once, at slot 0.
            (SignerModel::Seed { .. }, _) => return Err(StateError::DuplicateSigner),
            // Exactly one hardware signer is supported, and never
            // alongside external co-signers.
            (SignerModel::Secp256r1 { .. }, ExtensionMode::None) => {},
            (SignerModel::Secp256r1 { .. }, _) => return Err(StateError::ModeConflict),
            (SignerModel::ExternalAccount { .. }, ExtensionMode::Hardware { .. }) => {
                return Err(StateError::ModeConflict)
            },
            (SignerModel::ExternalAccount { address }, _) => {
                if self.find_external_account(address).is_some() {
                    return Err(StateError::DuplicateSigner);
                }
            },
        }

        let id = SignerId(self.slots.len() as u32);
        self.mode = match (&model, self.mode) {
            (SignerModel::Secp256r1 { .. }, _) => ExtensionMode::Hardware { count: 1 },
            (SignerModel::ExternalAccount { .. }, ExtensionMode::ExternalAccount { count }) => {
                ExtensionMode::ExternalAccount { count: count + 1 }
            },
            (SignerModel::ExternalAccount { .. }, _) => {
                ExtensionMode::ExternalAccount { count: 1 }
            },
            (SignerModel::Seed { .. }, mode) => mode,
        };
        self.slots.push(Some(model));
        Ok(id)
    }

    /// Batch-add external co-signers. All-or-nothing: a duplicate in the
    /// batch (or against existing state) rejects the whole call.
    pub fn add_external_account_signers(
        &mut self,
        addresses: &[Address],
    ) -> Result<Vec<SignerId>, StateError> {
        if matches!(self.mode, ExtensionMode::Hardware { .. }) {
            return Err(StateError::ModeConflict);
        }
        for (i, addr) in addresses.iter().enumerate() {
            if self.find_external_account(addr).is_some() || addresses[..i].contains(addr) {
                return Err(StateError::DuplicateSigner);
            }
        }
        let mut ids = Vec::with_capacity(addresses.len());
        for addr in addresses {
            ids.push(self.add_signer(SignerModel::ExternalAccount { address: *addr })?);
        }
        Ok(ids)
    }

    /// Remove external co-signers by slot handle. Returns how many were
    /// removed; dropping the last one leaves seed-only mode.
    pub fn remove_external_account_signers(
        &mut self,
        ids: &[SignerId],
    ) -> Result<u32, StateError> {
        for id in ids {
            match self.get_signer(*id) {
                Some(model) if model.kind() == SignerKind::ExternalAccount => {},
                Some(_) => return Err(StateError::ModeConflict),
                None => return Err(StateError::SignerNotFound),
            }
        }
        for id in ids {
            self.clear_slot(*id);
        }
        Ok(ids.len() as u32)
    }

    /// Atomic remove+add used to rotate a key without opening a removal
    /// window. The replacement must be the same credential kind.
    pub fn swap_signers(
        &mut self,
        remove_id: SignerId,
        new_model: SignerModel,
    ) -> Result<SignerId, StateError> {
        if remove_id == SignerId::SEED {
            return Err(StateError::SeedSignerProtected);
        }
        let old = self
            .get_signer(remove_id)
            .ok_or(StateError::SignerNotFound)?;
        if old.kind() != new_model.kind() {
            return Err(StateError::ModeConflict);
        }
        if let SignerModel::ExternalAccount { address } = &new_model {
            if self.find_external_account(address).is_some() {
                return Err(StateError::DuplicateSigner);
            }
        }
        // Tombstone first so the mode counter nets out to unchanged.
        self.clear_slot(remove_id);
        self.add_signer(new_model)
    }

    /// Tombstone a signer slot. Slot 0 (seed) is never removable.
    pub fn remove_signer(&mut self, id: SignerId) -> Result<(), StateError> {
        if id == SignerId::SEED {
            return Err(StateError::SeedSignerProtected);
        }
        if self.get_signer(id).is_none() {
            return Err(StateError::SignerNotFound);
        }
        self.clear_slot(id);
        Ok(())
    }

    /// Bind raw signature entries to registry slots. Pure parse-and-match:
    /// the layout already names the slot each component signs for, so no
    /// trial verification happens here.
    pub fn resolve_signers_from_sig(
        &self,
        entries: &[SignatureEntry],
    ) -> Result<Vec<ResolvedSigner>, StateError> {
        if entries.is_empty() {
            return Err(StateError::InvalidSignatureLayout);
        }
        let mut resolved: Vec<ResolvedSigner> = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = SignerId(entry.signer_id);
            if resolved.iter().any(|r| r.id == id) {
                return Err(StateError::InvalidSignatureLayout);
            }
            let model = self.get_signer(id).ok_or(StateError::SignerNotFound)?;
            resolved.push(ResolvedSigner {
                id,
                model: model.clone(),
                signature: entry.signature.clone(),
            });
        }
        Ok(resolved)
    }

    fn find_external_account(&self, address: &Address) -> Option<SignerId> {
        self.slots.iter().enumerate().find_map(|(idx, slot)| match slot {
            Some(SignerModel::ExternalAccount { address: a }) if a == address => {
                Some(SignerId(idx as u32))
            },
            _ => None,
        })
    }

    fn clear_slot(&mut self, id: SignerId) {
        let kind = match self.get_signer(id) {
            Some(model) => model.kind(),
            None => return,
        };
        self.slots[id.0 as usize] = None;
        self.mode = match (kind, self.mode) {
            (SignerKind::Secp256r1, ExtensionMode::Hardware { count }) if count <= 1 => {
                ExtensionMode::None
            },
            (SignerKind::Secp256r1, ExtensionMode::Hardware { count }) => {
                ExtensionMode::Hardware { count: count - 1 }
            },
            (SignerKind::ExternalAccount, ExtensionMode::ExternalAccount { count }) if count <= 1 => {
                ExtensionMode::None
            },
            (SignerKind::ExternalAccount, ExtensionMode::ExternalAccount { count }) => {
                ExtensionMode::ExternalAccount { count: count - 1 }
            },
            (_, mode) => mode,
        };
    }
}
