//! Signer credential records.

use borsh::{BorshDeserialize, BorshSerialize};
use vigil_interface::Address;

/// Stable registry slot handle. Slot 0 always holds the seed signer.
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct SignerId(pub u32);

impl SignerId {
    pub const SEED: SignerId = SignerId(0);
}

impl core::fmt::Display for SignerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignerKind {
    Seed,
    Secp256r1,
    ExternalAccount,
}

/// A credential record. The variants carry exactly the key material their
/// scheme needs, so a record can never hold a mismatched kind/key pair.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum SignerModel {
    /// The account's original credential, ed25519.
    Seed { pubkey: [u8; 32] },
    /// Hardware-bound credential; P-256 keys come as a coordinate pair.
    Secp256r1 {
        pubkey_x: [u8; 32],
        pubkey_y: [u8; 32],
    },
    /// Co-signer identified by another account's address.
    ExternalAccount { address: Address },
}

impl SignerModel {
    pub fn kind(&self) -> SignerKind {
        match self {
            SignerModel::Seed { .. } => SignerKind::Seed,
            SignerModel::Secp256r1 { .. } => SignerKind::Secp256r1,
            SignerModel::ExternalAccount { .. } => SignerKind::ExternalAccount,
        }
    }
}

/// A signer record paired with its stable slot index, as returned by the
/// registry read views.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct IndexedSigner {
    pub id: SignerId,
    pub model: SignerModel,
}
