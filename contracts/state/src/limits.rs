//! Per-signer rolling usage counters.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::signer::SignerId;

pub const SECONDS_PER_DAY: u64 = 86_400;

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
struct DayCounter {
    day: u64,
    count: u32,
}

/// Transaction counters bucketed per UTC day, used to cap how often an
/// external co-signer can drive the account within one day.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default)]
pub struct DailyUsage {
    counters: BTreeMap<SignerId, DayCounter>,
}

impl DailyUsage {
    pub fn count(&self, id: SignerId, now: u64) -> u32 {
        match self.counters.get(&id) {
            Some(c) if c.day == now / SECONDS_PER_DAY => c.count,
            _ => 0,
        }
    }

    /// Whether `id` still has budget left today.
    pub fn within_limit(&self, id: SignerId, now: u64, limit: u32) -> bool {
        self.count(id, now) < limit
    }

    /// Consume one slot of today's budget.
    pub fn consume(&mut self, id: SignerId, now: u64) {
        let day = now / SECONDS_PER_DAY;
        let counter = self.counters.entry(id).or_insert(DayCounter { day, count: 0 });
        if counter.day != day {
            counter.day = day;
            counter.count = 0;
        }
        counter.count += 1;
    }

    /// Drop the counter for a removed signer.
    pub fn forget(&mut self, id: SignerId) {
        self.counters.remove(&id);
    }
}
