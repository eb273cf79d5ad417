//! Properties that must hold for every multiset, checked exhaustively over
//! small ones.

use std::collections::BTreeSet;

use testresult::TestResult;

use trisect::{
    bills::BillMultiset,
    combination::{apply, build_combination},
    denominations::{Denomination, DenominationSet},
    distribute::distribute,
    partition::can_partition_into_three_equal,
    search::find_candidate_amounts,
};

/// Every multiset with up to `max` bills of each denomination.
fn small_multisets(max: u32) -> Vec<BillMultiset> {
    let mut all = vec![BillMultiset::new()];

    for denom in Denomination::ALL {
        all = all
            .into_iter()
            .flat_map(|bills| (0..=max).map(move |count| bills.with(denom, count)))
            .collect();
    }

    all
}

/// Reference check that walks bills one at a time and tracks every
/// reachable pair of sums for the first two stacks.
fn splits_by_enumeration(bills: &BillMultiset) -> bool {
    let total = bills.total_value();

    if total % 3 != 0 {
        return false;
    }

    let target = total / 3;
    let mut reachable = BTreeSet::from([(0_u64, 0_u64)]);

    for denom in bills.expand() {
        let value = denom.value();
        let mut next = BTreeSet::new();

        for &(first, second) in &reachable {
            next.insert((first, second));

            if first + value <= target {
                next.insert((first + value, second));
            }

            if second + value <= target {
                next.insert((first, second + value));
            }
        }

        reachable = next;
    }

    reachable.contains(&(target, target))
}

#[test]
fn oracle_matches_enumeration() {
    for bills in small_multisets(2) {
        assert_eq!(
            can_partition_into_three_equal(&bills),
            splits_by_enumeration(&bills),
            "disagreement for {bills}"
        );
    }
}

#[test]
fn distribution_conserves_bills() -> TestResult {
    for bills in small_multisets(2) {
        let mut union = BillMultiset::new();

        for stack in distribute(&bills) {
            union.merge(stack.bills())?;
        }

        assert_eq!(union, bills);
    }

    Ok(())
}

#[test]
fn combinations_are_exact() -> TestResult {
    let allowed_sets = [
        DenominationSet::all(),
        DenominationSet::new([Denomination::Twenty, Denomination::Ten]),
        DenominationSet::new([Denomination::Fifty, Denomination::Five]),
    ];

    for bills in small_multisets(1) {
        for allowed in &allowed_sets {
            for amount in (0..=bills.total_value()).step_by(5) {
                let Some(combination) = build_combination(&bills, amount, allowed) else {
                    continue;
                };

                assert_eq!(combination.value(), amount);
                assert!(combination.iter().all(|(denom, _)| allowed.contains(denom)));

                let remaining = apply(&bills, &combination)?;

                assert_eq!(remaining.total_value() + amount, bills.total_value());
            }
        }
    }

    Ok(())
}

#[test]
fn candidates_share_the_total_residue() -> TestResult {
    for bills in small_multisets(1) {
        let total = bills.total_value();
        let allowed = DenominationSet::all();

        for amount in find_candidate_amounts(&bills, None, &allowed) {
            assert_eq!(amount % 3, total % 3);

            let combination = build_combination(&bills, amount, &allowed).ok_or("no combination")?;

            assert!(can_partition_into_three_equal(&apply(&bills, &combination)?));
        }
    }

    Ok(())
}
