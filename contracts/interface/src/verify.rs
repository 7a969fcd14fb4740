//! Signature verification capability.
//!
//! The account decides *when* and *against which keys* verification runs;
//! the scheme itself sits behind this trait. [`StandardVerifier`] is the
//! in-process implementation for hosts without native precompiles.

use std::collections::BTreeMap;

use ed25519_dalek::{Signature as Ed25519Signature, Verifier, VerifyingKey};
use p256::ecdsa::signature::Verifier as _;
use p256::ecdsa::{Signature as P256Signature, VerifyingKey as P256VerifyingKey};
use p256::EncodedPoint;

use crate::call::Address;

pub trait SignatureVerifier {
    /// Verify a 64-byte ed25519 signature over `message` for `pubkey`.
    fn verify_ed25519(&self, pubkey: &[u8; 32], message: &[u8; 32], signature: &[u8]) -> bool;

    /// Verify a 64-byte ECDSA/P-256 signature over `message` for the
    /// uncompressed public key given as affine coordinates.
    fn verify_secp256r1(
        &self,
        pubkey_x: &[u8; 32],
        pubkey_y: &[u8; 32],
        message: &[u8; 32],
        signature: &[u8],
    ) -> bool;

    /// Verify that `signature` is valid for the co-signer account at
    /// `address`. On a chain host this is a cross-contract signature
    /// check against the other account.
    fn verify_external_account(&self, address: &Address, message: &[u8; 32], signature: &[u8])
        -> bool;
}

/// Software verifier: ed25519 via `ed25519-dalek`, P-256 via `p256`.
/// External co-signer accounts are registered explicitly with the ed25519
/// key that controls them.
#[derive(Default)]
pub struct StandardVerifier {
    external_accounts: BTreeMap<Address, [u8; 32]>,
}

impl StandardVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the controlling key for an external co-signer account.
    pub fn register_external_account(&mut self, address: Address, pubkey: [u8; 32]) {
        self.external_accounts.insert(address, pubkey);
    }
}

impl SignatureVerifier for StandardVerifier {
    fn verify_ed25519(&self, pubkey: &[u8; 32], message: &[u8; 32], signature: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(pubkey) else {
            return false;
        };
        let Ok(sig_bytes) = <&[u8; 64]>::try_from(signature) else {
            return false;
        };
        let sig = Ed25519Signature::from_bytes(sig_bytes);
        key.verify(message, &sig).is_ok()
    }

    fn verify_secp256r1(
        &self,
        pubkey_x: &[u8; 32],
        pubkey_y: &[u8; 32],
        message: &[u8; 32],
        signature: &[u8],
    ) -> bool {
        let point = EncodedPoint::from_affine_coordinates(
            pubkey_x.into(),
            pubkey_y.into(),
            false,
        );
        let Ok(key) = P256VerifyingKey::from_encoded_point(&point) else {
            return false;
        };
        let Ok(sig) = P256Signature::from_slice(signature) else {
            return false;
        };
        key.verify(message, &sig).is_ok()
    }

    fn verify_external_account(
        &self,
        address: &Address,
        message: &[u8; 32],
        signature: &[u8],
    ) -> bool {
        match self.external_accounts.get(address) {
            Some(pubkey) => self.verify_ed25519(pubkey, message, signature),
            None => false,
        }
    }
}
