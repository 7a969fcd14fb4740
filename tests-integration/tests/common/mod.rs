//! Common test utilities: an in-memory host and signing helpers.

use ed25519_dalek::{Signer as _, SigningKey};
use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::{Signature as P256Signature, SigningKey as P256SigningKey};
use vigil_interface::{
    selector, Address, Call, CallDispatcher, ExecutionResponse, HostEnv, HostError,
    SignatureEntry, SignatureVerifier, StandardVerifier, TransactionEnvelope, TX_VERSION_V1,
};
use vigil_program::{Account, AccountInstruction, VigilError};
use vigil_state::SignerModel;

pub const ACCOUNT_ADDRESS: Address = Address([0xac; 32]);

/// In-memory host: controllable clock and caller, a recording dispatcher
/// and software signature verification.
pub struct TestHost {
    pub caller: Address,
    pub account: Address,
    pub timestamp: u64,
    pub block: u64,
    pub verifier: StandardVerifier,
    pub dispatched: Vec<Call>,
    pub fail_calls: bool,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            caller: Address([0xca; 32]),
            account: ACCOUNT_ADDRESS,
            timestamp: 1_700_000_000,
            block: 1_000,
            verifier: StandardVerifier::new(),
            dispatched: Vec::new(),
            fail_calls: false,
        }
    }

    pub fn advance(&mut self, secs: u64, blocks: u64) {
        self.timestamp += secs;
        self.block += blocks;
    }
}

impl HostEnv for TestHost {
    fn caller(&self) -> Address {
        self.caller
    }

    fn account_address(&self) -> Address {
        self.account
    }

    fn block_timestamp(&self) -> u64 {
        self.timestamp
    }

    fn block_number(&self) -> u64 {
        self.block
    }
}

impl CallDispatcher for TestHost {
    fn dispatch(&mut self, call: &Call) -> Result<Vec<u8>, HostError> {
        if self.fail_calls {
            return Err(HostError::CallFailed("injected failure".into()));
        }
        self.dispatched.push(call.clone());
        Ok(vec![1])
    }
}

impl SignatureVerifier for TestHost {
    fn verify_ed25519(&self, pubkey: &[u8; 32], message: &[u8; 32], signature: &[u8]) -> bool {
        self.verifier.verify_ed25519(pubkey, message, signature)
    }

    fn verify_secp256r1(
        &self,
        pubkey_x: &[u8; 32],
        pubkey_y: &[u8; 32],
        message: &[u8; 32],
        signature: &[u8],
    ) -> bool {
        self.verifier
            .verify_secp256r1(pubkey_x, pubkey_y, message, signature)
    }

    fn verify_external_account(
        &self,
        address: &Address,
        message: &[u8; 32],
        signature: &[u8],
    ) -> bool {
        self.verifier
            .verify_external_account(address, message, signature)
    }
}

pub struct SeedSigner {
    key: SigningKey,
}

impl SeedSigner {
    pub fn new(byte: u8) -> Self {
        Self {
            key: SigningKey::from_bytes(&[byte; 32]),
        }
    }

    pub fn pubkey(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }

    /// Signature entry for registry slot 0.
    pub fn entry(&self, hash: &[u8; 32]) -> SignatureEntry {
        SignatureEntry {
            signer_id: 0,
            signature: self.key.sign(hash).to_bytes().to_vec(),
        }
    }
}

pub struct HardwareSigner {
    key: P256SigningKey,
}

impl HardwareSigner {
    pub fn new(byte: u8) -> Self {
        Self {
            key: P256SigningKey::from_slice(&[byte; 32]).expect("valid scalar"),
        }
    }

    pub fn model(&self) -> SignerModel {
        let point = self.key.verifying_key().to_encoded_point(false);
        let x: [u8; 32] = point.x().unwrap().as_slice().try_into().unwrap();
        let y: [u8; 32] = point.y().unwrap().as_slice().try_into().unwrap();
        SignerModel::Secp256r1 {
            pubkey_x: x,
            pubkey_y: y,
        }
    }

    pub fn entry(&self, signer_id: u32, hash: &[u8; 32]) -> SignatureEntry {
        let sig: P256Signature = self.key.sign(hash);
        SignatureEntry {
            signer_id,
            signature: sig.to_bytes().to_vec(),
        }
    }
}

pub struct ExtSigner {
    key: SigningKey,
    pub address: Address,
}

impl ExtSigner {
    pub fn new(byte: u8) -> Self {
        Self {
            key: SigningKey::from_bytes(&[byte; 32]),
            address: Address([byte; 32]),
        }
    }

    /// Make the host treat this signer's address as a contract controlled
    /// by its key.
    pub fn register(&self, host: &mut TestHost) {
        host.verifier
            .register_external_account(self.address, self.key.verifying_key().to_bytes());
    }

    pub fn entry(&self, signer_id: u32, hash: &[u8; 32]) -> SignatureEntry {
        SignatureEntry {
            signer_id,
            signature: self.key.sign(hash).to_bytes().to_vec(),
        }
    }
}

/// An unsigned envelope with test defaults.
pub fn envelope(calls: Vec<Call>, nonce: u64) -> TransactionEnvelope {
    TransactionEnvelope {
        calls,
        signature: vec![],
        nonce,
        max_fee: 1_000,
        version: TX_VERSION_V1,
    }
}

/// A plain outbound call to some other contract.
pub fn transfer_call(to_byte: u8) -> Call {
    Call::new(Address([to_byte; 32]), selector("transfer"), vec![0u8; 8])
}

/// A management self-call.
pub fn self_call(instruction: &AccountInstruction) -> Call {
    instruction.to_call(ACCOUNT_ADDRESS)
}

pub fn tx_hash(env: &TransactionEnvelope) -> [u8; 32] {
    env.tx_hash(&ACCOUNT_ADDRESS)
}

/// Validate then execute, as the protocol would.
pub fn run(
    account: &mut Account,
    host: &mut TestHost,
    env: &TransactionEnvelope,
) -> Result<ExecutionResponse, VigilError> {
    account.validate(host, env)?;
    account.execute(host, env)
}

/// A fresh seed-only account with a short execution time delay.
pub const TEST_ETD_SEC: u64 = 3_600;

pub fn seed_account(seed: &SeedSigner) -> Account {
    Account::with_execution_time_delay(seed.pubkey(), TEST_ETD_SEC)
}

/// Install a hardware signer through a full signed transaction. Returns
/// its registry slot id (always 1 on a fresh account).
pub fn add_hardware_signer(
    account: &mut Account,
    host: &mut TestHost,
    seed: &SeedSigner,
    hardware: &HardwareSigner,
    nonce: u64,
) -> u32 {
    let mut env = envelope(
        vec![self_call(&AccountInstruction::AddSigner {
            model: hardware.model(),
        })],
        nonce,
    );
    let hash = tx_hash(&env);
    env.signature = vec![seed.entry(&hash)];
    let response = run(account, host, &env).expect("add hardware signer");
    borsh::from_slice::<u32>(&response.retdata[0]).expect("signer id retdata")
}

/// Hand the account to external co-signers with the given threshold.
/// Returns the new signers' registry slot ids.
pub fn add_ext_signers(
    account: &mut Account,
    host: &mut TestHost,
    seed: &SeedSigner,
    signers: &[&ExtSigner],
    multisig_threshold: u32,
    nonce: u64,
) -> Vec<u32> {
    for s in signers {
        s.register(host);
    }
    let mut env = envelope(
        vec![self_call(&AccountInstruction::AddExternalAccountSigners {
            addresses: signers.iter().map(|s| s.address).collect(),
            multisig_threshold,
        })],
        nonce,
    );
    let hash = tx_hash(&env);
    env.signature = vec![seed.entry(&hash)];
    let response = run(account, host, &env).expect("add external signers");
    borsh::from_slice::<Vec<u32>>(&response.retdata[0]).expect("signer ids retdata")
}
