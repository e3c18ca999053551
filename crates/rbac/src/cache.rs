//! Per-member cache of effective authority sets.
//!
//! The cache is a materialized view with explicit invalidation, never
//! updated in place. Correctness under concurrent resolve/mutate traffic
//! rests on one rule: a computation must capture the member's generation
//! (via [`AuthorityCache::begin`]) *before* reading the ledger, and
//! [`AuthorityCache::store_if_current`] refuses to repopulate if an
//! invalidation bumped the generation in between. A resolve racing a
//! committed mutation therefore either observes the new ledger state or
//! gets discarded; it can never pin a pre-mutation set past the
//! invalidation point.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use warden_core::MemberId;

use crate::token::Token;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    value: Option<Arc<BTreeSet<Token>>>,
}

/// Shared, mutable member-id → effective-set map.
///
/// Contention is scoped to individual map accesses; there is no lock held
/// across a recomputation, so concurrent misses for the same member may
/// recompute redundantly (tolerated — generations keep it correct).
#[derive(Debug, Default)]
pub struct AuthorityCache {
    slots: RwLock<HashMap<MemberId, Slot>>,
}

impl AuthorityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached effective set for the member, if present.
    pub fn get(&self, member: MemberId) -> Option<Arc<BTreeSet<Token>>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(&member).and_then(|slot| slot.value.clone())
    }

    /// Capture the member's current generation before reading the ledger.
    pub fn begin(&self, member: MemberId) -> u64 {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(&member).map(|slot| slot.generation).unwrap_or(0)
    }

    /// Populate the member's entry, unless the generation moved since
    /// [`AuthorityCache::begin`]. Returns whether the value was stored.
    pub fn store_if_current(
        &self,
        member: MemberId,
        generation: u64,
        value: Arc<BTreeSet<Token>>,
    ) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(member).or_default();
        if slot.generation != generation {
            return false;
        }
        slot.value = Some(value);
        true
    }

    /// Discard the member's cached set and bump their generation.
    pub fn invalidate(&self, member: MemberId) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(member).or_default();
        slot.generation += 1;
        slot.value = None;
    }

    /// Fan-out invalidation: discard every listed member's cached set
    /// under a single lock acquisition.
    pub fn invalidate_many(&self, members: &[MemberId]) {
        if members.is_empty() {
            return;
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        for member in members {
            let slot = slots.entry(*member).or_default();
            slot.generation += 1;
            slot.value = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::RoleName;

    fn set(names: &[&str]) -> Arc<BTreeSet<Token>> {
        Arc::new(
            names
                .iter()
                .map(|n| Token::role(&RoleName::parse(n).unwrap()))
                .collect(),
        )
    }

    #[test]
    fn miss_then_populate_then_hit() {
        let cache = AuthorityCache::new();
        let member = MemberId::new();
        assert!(cache.get(member).is_none());

        let generation = cache.begin(member);
        assert!(cache.store_if_current(member, generation, set(&["USER"])));
        assert_eq!(cache.get(member).unwrap(), set(&["USER"]));
    }

    #[test]
    fn invalidation_discards_value() {
        let cache = AuthorityCache::new();
        let member = MemberId::new();
        let generation = cache.begin(member);
        cache.store_if_current(member, generation, set(&["USER"]));

        cache.invalidate(member);
        assert!(cache.get(member).is_none());
    }

    #[test]
    fn stale_computation_cannot_repopulate_past_invalidation() {
        let cache = AuthorityCache::new();
        let member = MemberId::new();

        // Computation starts, then a mutation invalidates.
        let generation = cache.begin(member);
        cache.invalidate(member);

        assert!(!cache.store_if_current(member, generation, set(&["USER"])));
        assert!(cache.get(member).is_none());
    }

    #[test]
    fn invalidate_many_bumps_every_member() {
        let cache = AuthorityCache::new();
        let a = MemberId::new();
        let b = MemberId::new();
        for m in [a, b] {
            let generation = cache.begin(m);
            cache.store_if_current(m, generation, set(&["USER"]));
        }

        cache.invalidate_many(&[a, b]);
        assert!(cache.get(a).is_none());
        assert!(cache.get(b).is_none());
    }

    #[test]
    fn unrelated_member_survives_invalidation() {
        let cache = AuthorityCache::new();
        let a = MemberId::new();
        let b = MemberId::new();
        let generation = cache.begin(a);
        cache.store_if_current(a, generation, set(&["USER"]));

        cache.invalidate(b);
        assert!(cache.get(a).is_some());
    }
}
