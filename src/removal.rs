//! Removal Feasibility
//!
//! Decides whether an exact amount can be physically taken out of a bill
//! multiset using only an allowed set of denominations. The same memoized
//! search also reconstructs the bills to take, see
//! [`build_combination`](crate::combination::build_combination).

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::{
    bills::BillMultiset,
    combination::Combination,
    denominations::{Denomination, DenominationSet},
};

/// Decide whether `amount` can be assembled exactly from the bills in
/// `bills`, restricted to `allowed`.
///
/// Removing zero is always possible.
pub fn can_remove(bills: &BillMultiset, amount: u64, allowed: &DenominationSet) -> bool {
    RemovalSearch::new(bills, allowed).run(amount).is_some()
}

/// Memo key for one node of the removal search.
///
/// The availability vector is part of the key: two branches can reach the
/// same `(remaining, index)` pair having used different bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RemovalState {
    remaining: u64,
    index: usize,
    available: [u32; 5],
}

/// Bounded depth-first search over allowed denominations, largest count of
/// the current denomination first.
///
/// Availability is tracked as an immutable capacity vector plus a stack of
/// per-level "taken" counts, so backtracking is a `pop` rather than a clone.
/// A search value lives for exactly one top-level call.
#[derive(Debug)]
pub(crate) struct RemovalSearch<'a> {
    denominations: &'a [Denomination],
    capacity: SmallVec<[u32; 5]>,
    taken: SmallVec<[u32; 5]>,
    step: Option<u64>,
    memo: FxHashMap<RemovalState, Option<Combination>>,
}

impl<'a> RemovalSearch<'a> {
    /// Prepare a search over `bills` restricted to `allowed`.
    pub(crate) fn new(bills: &BillMultiset, allowed: &'a DenominationSet) -> Self {
        Self {
            denominations: allowed.as_slice(),
            capacity: allowed.iter().map(|denom| bills.count(denom)).collect(),
            taken: SmallVec::new(),
            step: allowed.step(),
            memo: FxHashMap::default(),
        }
    }

    /// Find the first combination, in greedy-high order, worth exactly
    /// `amount`. `None` means no combination exists.
    pub(crate) fn run(mut self, amount: u64) -> Option<Combination> {
        if amount == 0 {
            return Some(Combination::empty());
        }

        if amount > self.reachable_value() {
            trace!(amount, "amount exceeds the value held in allowed denominations");
            return None;
        }

        match self.step {
            Some(step) if amount % step == 0 => {}
            _ => {
                trace!(amount, "amount is not a multiple of the allowed step");
                return None;
            }
        }

        let combination = self.search(amount, 0);

        trace!(
            amount,
            found = combination.is_some(),
            states = self.memo.len(),
            "removal search finished"
        );

        combination
    }

    fn search(&mut self, remaining: u64, index: usize) -> Option<Combination> {
        if remaining == 0 {
            return Some(Combination::empty());
        }

        let denom = *self.denominations.get(index)?;

        let state = self.state(remaining, index);

        if let Some(cached) = self.memo.get(&state) {
            return *cached;
        }

        let available = self.capacity.get(index).copied().unwrap_or(0);
        let max_count = (remaining / denom.value()).min(u64::from(available));
        let max_count = u32::try_from(max_count).unwrap_or(available);

        let mut found = None;

        for count in (0..=max_count).rev() {
            self.taken.push(count);
            let result = self.search(remaining - u64::from(count) * denom.value(), index + 1);
            self.taken.pop();

            if let Some(mut combination) = result {
                combination.insert(denom, count);
                found = Some(combination);
                break;
            }
        }

        self.memo.insert(state, found);

        found
    }

    fn state(&self, remaining: u64, index: usize) -> RemovalState {
        let mut available = [0; 5];

        for (position, slot) in available.iter_mut().enumerate() {
            let capacity = self.capacity.get(position).copied().unwrap_or(0);
            let taken = self.taken.get(position).copied().unwrap_or(0);

            *slot = capacity.saturating_sub(taken);
        }

        RemovalState {
            remaining,
            index,
            available,
        }
    }

    fn reachable_value(&self) -> u64 {
        self.denominations
            .iter()
            .zip(&self.capacity)
            .map(|(denom, &count)| denom.value() * u64::from(count))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bills() -> BillMultiset {
        BillMultiset::new()
            .with(Denomination::Five, 20)
            .with(Denomination::Ten, 10)
            .with(Denomination::Twenty, 5)
            .with(Denomination::Fifty, 2)
            .with(Denomination::Hundred, 1)
    }

    #[test]
    fn zero_is_always_removable() {
        assert!(can_remove(&BillMultiset::new(), 0, &DenominationSet::all()));
        assert!(can_remove(&bills(), 0, &DenominationSet::none()));
    }

    #[test]
    fn removes_exact_amounts() {
        assert!(can_remove(&bills(), 20, &DenominationSet::all()));
        assert!(can_remove(&bills(), 35, &DenominationSet::all()));
        assert!(can_remove(&bills(), 500, &DenominationSet::all()));
    }

    #[test]
    fn rejects_amounts_above_holdings() {
        assert!(!can_remove(&bills(), 505, &DenominationSet::all()));
    }

    #[test]
    fn rejects_amounts_off_the_step() {
        assert!(!can_remove(&bills(), 7, &DenominationSet::all()));

        let tens_and_twenties = DenominationSet::new([Denomination::Ten, Denomination::Twenty]);

        assert!(!can_remove(&bills(), 25, &tens_and_twenties));
        assert!(can_remove(&bills(), 30, &tens_and_twenties));
    }

    #[test]
    fn respects_allow_list() {
        let only_fifties = DenominationSet::new([Denomination::Fifty]);

        assert!(can_remove(&bills(), 100, &only_fifties));
        assert!(!can_remove(&bills(), 150, &only_fifties));
        assert!(!can_remove(&bills(), 20, &DenominationSet::none()));
    }

    #[test]
    fn backtracks_past_greedy_dead_ends() {
        // Greedy takes the $50 and is left needing $10 from $20s only.
        let bills = BillMultiset::new()
            .with(Denomination::Fifty, 1)
            .with(Denomination::Twenty, 3);

        assert!(can_remove(&bills, 60, &DenominationSet::all()));
    }

    #[test]
    fn respects_available_counts() {
        let bills = BillMultiset::new().with(Denomination::Twenty, 2);

        assert!(can_remove(&bills, 40, &DenominationSet::all()));
        assert!(!can_remove(&bills, 60, &DenominationSet::all()));
    }
}
