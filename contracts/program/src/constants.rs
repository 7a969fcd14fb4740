//! Program-level policy constants.

pub use vigil_state::multisig::{PENDING_TXN_EXPIRY_BLOCKS, PENDING_TXN_EXPIRY_SEC};

/// Fee cap on a transaction an external co-signer stages before the
/// multisig threshold is met: 0.01 of an 18-decimals fee token. The
/// transaction that finally meets the threshold is not capped.
pub const MAX_EXT_ACCOUNT_SIGNER_VALIDATION_FEE: u128 = 10_000_000_000_000_000;

/// How many transactions one external co-signer may drive per UTC day.
pub const EXT_ACCOUNT_DAILY_TXN_LIMIT: u32 = 24;

/// Default execution time delay for deferred requests: four days.
pub const DEFAULT_EXECUTION_TIME_DELAY_SEC: u64 = 4 * 24 * 60 * 60;
