//! Signer registry management through full transactions.

mod common;

use common::{
    add_hardware_signer, envelope, run, seed_account, self_call, transfer_call, tx_hash,
    HardwareSigner, SeedSigner, TestHost, ACCOUNT_ADDRESS,
};
use vigil_interface::selector;
use vigil_interface::Call;
use vigil_program::{AccountInstruction, VigilError};
use vigil_state::{ExtensionMode, StateError};

#[test]
fn test_add_hardware_signer() {
    let seed = SeedSigner::new(1);
    let hardware = HardwareSigner::new(3);
    let mut account = seed_account(&seed);
    let mut host = TestHost::new();

    let id = add_hardware_signer(&mut account, &mut host, &seed, &hardware, 1);
    assert_eq!(id, 1);
    assert_eq!(account.get_signers(host.timestamp).len(), 2);
    assert_eq!(
        account.state().registry.mode(),
        ExtensionMode::Hardware { count: 1 }
    );
}

#[test]
fn test_hardware_signer_signs_transfers() {
    let seed = SeedSigner::new(1);
    let hardware = HardwareSigner::new(3);
    let mut account = seed_account(&seed);
    let mut host = TestHost::new();
    let hw_id = add_hardware_signer(&mut account, &mut host, &seed, &hardware, 1);

    let mut env = envelope(vec![transfer_call(9)], 2);
    let hash = tx_hash(&env);
    env.signature = vec![hardware.entry(hw_id, &hash)];

    run(&mut account, &mut host, &env).unwrap();
    assert_eq!(host.dispatched.len(), 1);
}

#[test]
fn test_second_hardware_signer_rejected() {
    let seed = SeedSigner::new(1);
    let hardware = HardwareSigner::new(3);
    let second = HardwareSigner::new(4);
    let mut account = seed_account(&seed);
    let mut host = TestHost::new();
    let hw_id = add_hardware_signer(&mut account, &mut host, &seed, &hardware, 1);

    let mut env = envelope(
        vec![self_call(&AccountInstruction::AddSigner {
            model: second.model(),
        })],
        2,
    );
    let hash = tx_hash(&env);
    env.signature = vec![hardware.entry(hw_id, &hash)];

    assert_eq!(
        run(&mut account, &mut host, &env).unwrap_err(),
        VigilError::State(StateError::ModeConflict)
    );
    assert_eq!(account.get_signers(host.timestamp).len(), 2);
}

#[test]
fn test_swap_rotates_hardware_key() {
    let seed = SeedSigner::new(1);
    let hardware = HardwareSigner::new(3);
    let replacement = HardwareSigner::new(4);
    let mut account = seed_account(&seed);
    let mut host = TestHost::new();
    let hw_id = add_hardware_signer(&mut account, &mut host, &seed, &hardware, 1);

    let mut env = envelope(
        vec![self_call(&AccountInstruction::SwapSigners {
            remove_id: hw_id,
            model: replacement.model(),
        })],
        2,
    );
    let hash = tx_hash(&env);
    env.signature = vec![hardware.entry(hw_id, &hash)];
    let response = run(&mut account, &mut host, &env).unwrap();
    let new_id: u32 = borsh::from_slice(&response.retdata[0]).unwrap();
    assert_ne!(new_id, hw_id);

    // The replacement key signs; the old key's slot is gone.
    let mut env = envelope(vec![transfer_call(9)], 3);
    let hash = tx_hash(&env);
    env.signature = vec![replacement.entry(new_id, &hash)];
    run(&mut account, &mut host, &env).unwrap();

    let mut env = envelope(vec![transfer_call(9)], 4);
    let hash = tx_hash(&env);
    env.signature = vec![hardware.entry(hw_id, &hash)];
    assert_eq!(
        account.validate(&host, &env).unwrap_err(),
        VigilError::State(StateError::SignerNotFound)
    );
}

#[test]
fn test_remove_hardware_signer_returns_to_seed_mode() {
    let seed = SeedSigner::new(1);
    let hardware = HardwareSigner::new(3);
    let mut account = seed_account(&seed);
    let mut host = TestHost::new();
    let hw_id = add_hardware_signer(&mut account, &mut host, &seed, &hardware, 1);

    let mut env = envelope(
        vec![self_call(&AccountInstruction::RemoveSigner { signer_id: hw_id })],
        2,
    );
    let hash = tx_hash(&env);
    env.signature = vec![hardware.entry(hw_id, &hash)];
    run(&mut account, &mut host, &env).unwrap();

    assert_eq!(account.state().registry.mode(), ExtensionMode::None);

    // Seed control is restored.
    let mut env = envelope(vec![transfer_call(9)], 3);
    let hash = tx_hash(&env);
    env.signature = vec![seed.entry(&hash)];
    run(&mut account, &mut host, &env).unwrap();
}

#[test]
fn test_seed_signer_cannot_be_removed() {
    let seed = SeedSigner::new(1);
    let hardware = HardwareSigner::new(3);
    let mut account = seed_account(&seed);
    let mut host = TestHost::new();
    let hw_id = add_hardware_signer(&mut account, &mut host, &seed, &hardware, 1);

    let mut env = envelope(
        vec![self_call(&AccountInstruction::RemoveSigner { signer_id: 0 })],
        2,
    );
    let hash = tx_hash(&env);
    env.signature = vec![hardware.entry(hw_id, &hash)];

    assert_eq!(
        run(&mut account, &mut host, &env).unwrap_err(),
        VigilError::State(StateError::SeedSignerProtected)
    );
}

#[test]
fn test_direct_management_call_requires_self() {
    let seed = SeedSigner::new(1);
    let hardware = HardwareSigner::new(3);
    let mut account = seed_account(&seed);
    let mut host = TestHost::new();

    let call = self_call(&AccountInstruction::AddSigner {
        model: hardware.model(),
    });
    assert_eq!(
        account.handle_call(&mut host, &call).unwrap_err(),
        VigilError::PrivilegeDenied
    );

    // The same call succeeds when the account itself is the caller.
    host.caller = ACCOUNT_ADDRESS;
    account.handle_call(&mut host, &call).unwrap();
    assert_eq!(account.get_signers(host.timestamp).len(), 2);
}

#[test]
fn test_selector_calldata_mismatch_rejected() {
    let seed = SeedSigner::new(1);
    let hardware = HardwareSigner::new(3);
    let mut account = seed_account(&seed);
    let mut host = TestHost::new();
    host.caller = ACCOUNT_ADDRESS;

    let instruction = AccountInstruction::AddSigner {
        model: hardware.model(),
    };
    let call = Call::new(
        ACCOUNT_ADDRESS,
        selector("transfer"),
        borsh::to_vec(&instruction).unwrap(),
    );
    assert_eq!(
        account.handle_call(&mut host, &call).unwrap_err(),
        VigilError::SelectorMismatch
    );
}
