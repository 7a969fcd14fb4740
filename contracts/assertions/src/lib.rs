//! Guard helpers for the account program.
//!
//! Each guard is a precondition check that maps a failed predicate to the
//! caller-supplied error, so action handlers read as a flat list of
//! requirements before any mutation.

use vigil_interface::{Address, QUERY_VERSION_FLAG, TX_VERSION_V1, TX_VERSION_V3};

macro_rules! guard {
    ($func_name:ident, $($param:ident: $type:ty),* $(,)? | $check:expr) => {
        #[inline(always)]
        pub fn $func_name<E>($($param: $type,)* error: E) -> Result<(), E> {
            if $check {
                Ok(())
            } else {
                Err(error)
            }
        }
    };
}

guard!(check_self_call, caller: &Address, account: &Address |
    caller == account
);

guard!(check_caller, caller: &Address, expected: &Address |
    caller == expected
);

guard!(check_version_supported, version: u64 | {
    let base = version & !QUERY_VERSION_FLAG;
    base == TX_VERSION_V1 || base == TX_VERSION_V3
});

guard!(check_fee_within, max_fee: u128, cap: u128 |
    max_fee <= cap
);

guard!(check_non_empty, data: &[u8] |
    !data.is_empty()
);

guard!(check_within, value: u32, limit: u32 |
    value <= limit
);

guard!(check_eq_count, value: u32, expected: u32 |
    value == expected
);
