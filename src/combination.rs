//! Combinations
//!
//! A [`Combination`] names exactly which bills to take out of a multiset to
//! realise a removal amount.

use serde::{Serialize, Serializer, ser::SerializeMap};
use thiserror::Error;
use tracing::warn;

use crate::{
    bills::{BillMultiset, BillsError},
    denominations::{Denomination, DenominationSet},
    removal::RemovalSearch,
};

/// Message shown for an empty or missing combination.
pub const NOTHING_TO_REMOVE: &str = "No bills need to be removed";

/// Errors raised while applying a removal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemovalError {
    /// The combination asked for bills that are not held.
    #[error(transparent)]
    Bills(#[from] BillsError),

    /// A reconstructed combination is not worth the amount it was built for
    /// (this is a bug).
    #[error("combination is worth {actual}, expected {expected}")]
    ValueMismatch {
        /// Requested amount
        expected: u64,

        /// Value of the combination actually built
        actual: u64,
    },
}

/// Bills to remove, per denomination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Combination {
    bills: BillMultiset,
}

impl Combination {
    /// A combination that removes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Record `count` bills of `denom`; zero counts are ignored.
    pub fn insert(&mut self, denom: Denomination, count: u32) {
        if count > 0 {
            self.bills.set_count(denom, count);
        }
    }

    /// Bills of `denom` in the combination.
    pub fn count(&self, denom: Denomination) -> u32 {
        self.bills.count(denom)
    }

    /// Total face value removed.
    pub fn value(&self) -> u64 {
        self.bills.total_value()
    }

    /// Check if the combination removes nothing.
    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    /// The combination as a bill multiset.
    pub fn bills(&self) -> &BillMultiset {
        &self.bills
    }

    /// Iterate the denominations actually used, highest value first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        self.bills.iter_present()
    }
}

impl From<BillMultiset> for Combination {
    fn from(bills: BillMultiset) -> Self {
        Self { bills }
    }
}

/// Serialised as a map of only the denominations used: `{"20": 1}`.
impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let used: Vec<(Denomination, u32)> = self.iter().collect();
        let mut map = serializer.serialize_map(Some(used.len()))?;

        for (denom, count) in used.into_iter().rev() {
            map.serialize_entry(denom.as_key(), &count)?;
        }

        map.end()
    }
}

/// Outcome of removing an amount from a multiset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Removal {
    /// An exact combination was found and removed.
    Exact {
        /// Bills removed
        combination: Combination,
    },

    /// No exact combination exists; the greedy fallback removed as much as
    /// it could without exceeding the amount.
    Degraded {
        /// Bills actually removed
        removed: Combination,

        /// Amount still missing
        shortfall: u64,
    },
}

impl Removal {
    /// Bills taken out, whichever way they were chosen.
    pub fn removed(&self) -> &Combination {
        match self {
            Removal::Exact { combination } => combination,
            Removal::Degraded { removed, .. } => removed,
        }
    }

    /// Whether this removal fell back to the greedy path.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Removal::Degraded { .. })
    }
}

/// Reconstruct one concrete set of bills worth exactly `amount`, using only
/// `allowed` denominations.
///
/// Larger counts of higher denominations are preferred; smaller counts are
/// tried only after a dead end. Returns `None` when no exact combination
/// exists, and an empty combination for `amount == 0`.
pub fn build_combination(
    bills: &BillMultiset,
    amount: u64,
    allowed: &DenominationSet,
) -> Option<Combination> {
    RemovalSearch::new(bills, allowed).run(amount)
}

/// Human readable summary of a combination, e.g.
/// `"Remove 1 $20 bill, 2 $5 bills (total: $30)"`.
pub fn describe(combination: Option<&Combination>) -> String {
    let Some(combination) = combination.filter(|combination| !combination.is_empty()) else {
        return NOTHING_TO_REMOVE.to_string();
    };

    let mut parts = String::new();

    for (idx, (denom, count)) in combination.iter().enumerate() {
        if idx > 0 {
            parts.push_str(", ");
        }

        let noun = if count == 1 { "bill" } else { "bills" };

        parts.push_str(&format!("{count} {denom} {noun}"));
    }

    format!("Remove {parts} (total: ${})", combination.value())
}

/// Return a copy of `bills` with `combination` taken out.
///
/// # Errors
///
/// Returns [`RemovalError::Bills`] if the combination asks for more bills
/// than are held.
pub fn apply(bills: &BillMultiset, combination: &Combination) -> Result<BillMultiset, RemovalError> {
    let mut remaining = *bills;

    remaining.remove(combination.bills())?;

    Ok(remaining)
}

/// Greedy high-to-low extraction: take bills from `allowed` denominations
/// while the running total stays at or below `amount`.
///
/// This is only a fallback. The result may be worth less than `amount`.
pub fn greedy_removal(bills: &BillMultiset, amount: u64, allowed: &DenominationSet) -> Combination {
    let mut combination = Combination::empty();
    let mut taken = 0;

    for denom in allowed.iter() {
        let room = (amount - taken) / denom.value();
        let count = room.min(u64::from(bills.count(denom)));
        let count = u32::try_from(count).unwrap_or(0);

        combination.insert(denom, count);
        taken += u64::from(count) * denom.value();

        if taken == amount {
            break;
        }
    }

    combination
}

/// Remove `amount` from a copy of `bills`.
///
/// Uses the exact combination when one exists and falls back to
/// [`greedy_removal`] otherwise; the fallback is reported as
/// [`Removal::Degraded`] so it is never mistaken for a verified answer.
///
/// # Errors
///
/// Returns a [`RemovalError`] if the chosen bills are not held or an exact
/// combination is not worth `amount`. Both indicate a bug.
pub fn remove_amount(
    bills: &BillMultiset,
    amount: u64,
    allowed: &DenominationSet,
) -> Result<(BillMultiset, Removal), RemovalError> {
    let removal = match build_combination(bills, amount, allowed) {
        Some(combination) => {
            let actual = combination.value();

            if actual != amount {
                return Err(RemovalError::ValueMismatch {
                    expected: amount,
                    actual,
                });
            }

            Removal::Exact { combination }
        }
        None => {
            let removed = greedy_removal(bills, amount, allowed);
            let shortfall = amount.saturating_sub(removed.value());

            warn!(amount, shortfall, "no exact combination, removed greedily");

            Removal::Degraded { removed, shortfall }
        }
    };

    let remaining = apply(bills, removal.removed())?;

    Ok((remaining, removal))
}
