//! Partition Oracle
//!
//! Decides whether a bill multiset can be split into three stacks of exactly
//! equal value, and rebuilds one such split on request.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::{bills::BillMultiset, denominations::Denomination};

/// Every canonical bill value is a multiple of this.
const VALUE_STEP: u64 = 5;

/// Decide whether `bills` can be split into three stacks of equal value.
///
/// Pure and deterministic: the memo table lives only for this call.
pub fn can_partition_into_three_equal(bills: &BillMultiset) -> bool {
    let total = bills.total_value();

    if total % 3 != 0 {
        return false;
    }

    can_split_evenly(bills, total / 3)
}

/// Decide whether `bills` can be split into three stacks worth exactly
/// `target` each.
///
/// Rejects immediately when `target` is not a multiple of $5 or when three
/// stacks of `target` would not account for every bill.
pub fn can_split_evenly(bills: &BillMultiset, target: u64) -> bool {
    if target % VALUE_STEP != 0 || target.checked_mul(3) != Some(bills.total_value()) {
        return false;
    }

    let mut search = PartitionSearch::new(bills, target);
    let feasible = search.solve(0, 0, 0);

    trace!(
        target,
        feasible,
        states = search.memo.len(),
        "partition search finished"
    );

    feasible
}

/// Split `bills` into three stacks worth `total / 3` each, if possible.
///
/// Returns `None` whenever [`can_partition_into_three_equal`] is false.
pub fn split_into_three_equal(bills: &BillMultiset) -> Option<[BillMultiset; 3]> {
    let total = bills.total_value();

    if total % 3 != 0 || (total / 3) % VALUE_STEP != 0 {
        return None;
    }

    let stacks = PartitionSearch::new(bills, total / 3).witness();

    trace!(found = stacks.is_some(), "partition witness finished");

    stacks
}

/// Memo key. Stacks one and two are interchangeable, so the key stores
/// their sums as an ordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PartitionState {
    index: usize,
    low: u64,
    high: u64,
}

/// Search over denominations tracking the running sums of stacks one and
/// two; stack three takes whatever is left.
#[derive(Debug)]
struct PartitionSearch {
    /// Count of every denomination actually held
    groups: SmallVec<[(Denomination, u32); 5]>,
    target: u64,
    memo: FxHashMap<PartitionState, bool>,
}

impl PartitionSearch {
    fn new(bills: &BillMultiset, target: u64) -> Self {
        Self {
            groups: bills.iter_present().collect(),
            target,
            memo: FxHashMap::default(),
        }
    }

    fn solve(&mut self, index: usize, first: u64, second: u64) -> bool {
        if first > self.target || second > self.target {
            return false;
        }

        let Some(&(denom, count)) = self.groups.get(index) else {
            // Stack three holds the rest, which equals `target` by the
            // total-value precondition.
            return first == self.target && second == self.target;
        };

        let state = PartitionState {
            index,
            low: first.min(second),
            high: first.max(second),
        };

        if let Some(&known) = self.memo.get(&state) {
            return known;
        }

        let feasible = self
            .next_split(index, denom.value(), count, first, second)
            .is_some();

        self.memo.insert(state, feasible);

        feasible
    }

    /// Find the first way of handing `count` bills of `value` to stacks one
    /// and two that still completes, leaving the rest for stack three.
    fn next_split(
        &mut self,
        index: usize,
        value: u64,
        count: u32,
        first: u64,
        second: u64,
    ) -> Option<(u32, u32)> {
        for to_first in 0..=count {
            let next_first = first + u64::from(to_first) * value;

            if next_first > self.target {
                break;
            }

            for to_second in 0..=(count - to_first) {
                let next_second = second + u64::from(to_second) * value;

                if next_second > self.target {
                    break;
                }

                if self.solve(index + 1, next_first, next_second) {
                    return Some((to_first, to_second));
                }
            }
        }

        None
    }

    /// Replay the memoized search, recording the split chosen at each
    /// denomination.
    fn witness(&mut self) -> Option<[BillMultiset; 3]> {
        if !self.solve(0, 0, 0) {
            return None;
        }

        let mut stacks = [BillMultiset::new(); 3];
        let [one, two, three] = &mut stacks;
        let (mut first, mut second) = (0, 0);

        let groups = self.groups.clone();

        for (index, &(denom, count)) in groups.iter().enumerate() {
            let (to_first, to_second) =
                self.next_split(index, denom.value(), count, first, second)?;

            one.set_count(denom, to_first);
            two.set_count(denom, to_second);
            three.set_count(denom, count - to_first - to_second);

            first += u64::from(to_first) * denom.value();
            second += u64::from(to_second) * denom.value();
        }

        Some(stacks)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn three_fives_split_evenly() {
        let bills = BillMultiset::new().with(Denomination::Five, 3);

        assert!(can_partition_into_three_equal(&bills));
    }

    #[test]
    fn single_hundred_is_not_divisible_by_three() {
        let bills = BillMultiset::new().with(Denomination::Hundred, 1);

        assert!(!can_partition_into_three_equal(&bills));
    }

    #[test]
    fn empty_multiset_splits_into_three_empty_stacks() {
        assert!(can_partition_into_three_equal(&BillMultiset::new()));
    }

    #[test]
    fn divisible_total_with_oversized_bill_is_infeasible() {
        // 270 / 3 = 90, but the $100 bill cannot fit in any stack.
        let bills = BillMultiset::new()
            .with(Denomination::Five, 6)
            .with(Denomination::Ten, 6)
            .with(Denomination::Twenty, 4)
            .with(Denomination::Hundred, 1);

        assert!(!can_partition_into_three_equal(&bills));
    }

    #[test]
    fn mixed_denominations_split_evenly() {
        // 3 x $20 + 3 x $10 = 90, stacks of 30.
        let bills = BillMultiset::new()
            .with(Denomination::Twenty, 3)
            .with(Denomination::Ten, 3);

        assert!(can_partition_into_three_equal(&bills));
    }

    #[test]
    fn needs_search_beyond_greedy() {
        // 480 in stacks of 160: requires mixing the $100 with small bills.
        let bills = BillMultiset::new()
            .with(Denomination::Five, 20)
            .with(Denomination::Ten, 10)
            .with(Denomination::Twenty, 4)
            .with(Denomination::Fifty, 2)
            .with(Denomination::Hundred, 1);

        assert!(can_partition_into_three_equal(&bills));
    }

    #[test]
    fn too_few_bills_for_three_stacks() {
        // $15 in stacks of $5 needs three bills; only two are held.
        let bills = BillMultiset::new()
            .with(Denomination::Five, 1)
            .with(Denomination::Ten, 1);

        assert!(!can_partition_into_three_equal(&bills));
    }

    #[test]
    fn rejects_target_off_the_five_dollar_grid() {
        let bills = BillMultiset::new()
            .with(Denomination::Five, 1)
            .with(Denomination::Ten, 1);

        assert!(!can_split_evenly(&bills, 7));
    }

    #[test]
    fn rejects_target_that_does_not_cover_every_bill() {
        let bills = BillMultiset::new().with(Denomination::Five, 6);

        assert!(can_split_evenly(&bills, 10));
        assert!(!can_split_evenly(&bills, 5));
    }

    #[test]
    fn huge_target_is_rejected_without_overflow() {
        let bills = BillMultiset::new().with(Denomination::Five, 3);

        assert!(!can_split_evenly(&bills, u64::MAX));
        assert!(!can_split_evenly(&bills, u64::MAX / 5 * 5));
        assert!(!can_split_evenly(&BillMultiset::new(), u64::MAX / 5 * 5));
    }

    #[test]
    fn witness_stacks_hold_every_bill_at_equal_value() -> TestResult {
        let bills = BillMultiset::new()
            .with(Denomination::Hundred, 2)
            .with(Denomination::Fifty, 3)
            .with(Denomination::Twenty, 5)
            .with(Denomination::Ten, 2)
            .with(Denomination::Five, 5);
        let target = bills.total_value() / 3;

        let stacks = split_into_three_equal(&bills).ok_or("no split")?;
        let mut union = BillMultiset::new();

        for stack in &stacks {
            assert_eq!(stack.total_value(), target);
            union.merge(stack)?;
        }

        assert_eq!(union, bills);

        Ok(())
    }

    #[test]
    fn three_fifties_go_one_per_stack() -> TestResult {
        let bills = BillMultiset::new().with(Denomination::Fifty, 3);

        let stacks = split_into_three_equal(&bills).ok_or("no split")?;

        for stack in stacks {
            assert_eq!(stack, BillMultiset::new().with(Denomination::Fifty, 1));
        }

        Ok(())
    }

    #[test]
    fn no_witness_when_split_is_impossible() {
        let scenario_a = BillMultiset::new()
            .with(Denomination::Five, 6)
            .with(Denomination::Ten, 6)
            .with(Denomination::Twenty, 4)
            .with(Denomination::Hundred, 1);

        assert_eq!(split_into_three_equal(&scenario_a), None);
        assert_eq!(
            split_into_three_equal(&BillMultiset::new().with(Denomination::Ten, 1)),
            None
        );
        assert_eq!(
            split_into_three_equal(&BillMultiset::new()),
            Some([BillMultiset::new(); 3])
        );
    }

    #[test]
    fn repeated_calls_agree() {
        let bills = BillMultiset::new()
            .with(Denomination::Fifty, 3)
            .with(Denomination::Hundred, 3);

        let first = can_partition_into_three_equal(&bills);
        let second = can_partition_into_three_equal(&bills);

        assert!(first);
        assert_eq!(first, second);
    }
}
