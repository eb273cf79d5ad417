//! Amount Search
//!
//! Finds amounts that can be removed from a bill multiset so that what is
//! left splits into three stacks of exactly equal value.

use tracing::{debug, error};

use crate::{
    bills::BillMultiset,
    combination::{apply, build_combination},
    denominations::DenominationSet,
    partition::can_partition_into_three_equal,
};

/// Tuning for the untargeted scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Amounts in `1..=scan_window` are scanned first.
    pub scan_window: u64,

    /// Maximum number of amounts returned by an untargeted search.
    pub max_candidates: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            scan_window: 100,
            max_candidates: 5,
        }
    }
}

/// Amount search over one multiset and allow-list.
///
/// Every check builds its own memo tables, so a search value holds no state
/// between calls beyond its inputs.
#[derive(Debug)]
pub struct AmountSearch<'a> {
    bills: &'a BillMultiset,
    allowed: &'a DenominationSet,
    total: u64,
    config: SearchConfig,
}

impl<'a> AmountSearch<'a> {
    /// Search `bills`, removing only `allowed` denominations.
    pub fn new(bills: &'a BillMultiset, allowed: &'a DenominationSet) -> Self {
        Self::with_config(bills, allowed, SearchConfig::default())
    }

    /// Search with custom scan limits.
    pub fn with_config(
        bills: &'a BillMultiset,
        allowed: &'a DenominationSet,
        config: SearchConfig,
    ) -> Self {
        Self {
            bills,
            allowed,
            total: bills.total_value(),
            config,
        }
    }

    /// Total value of the multiset being searched.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether removing `amount` is possible and leaves a remainder that
    /// splits into three equal stacks.
    ///
    /// Only amounts congruent to the total modulo 3 can leave a remainder
    /// divisible by three, so every other amount is rejected before any
    /// search runs.
    pub fn is_candidate(&self, amount: u64) -> bool {
        if amount > self.total || amount % 3 != self.total % 3 {
            return false;
        }

        let Some(combination) = build_combination(self.bills, amount, self.allowed) else {
            return false;
        };

        match apply(self.bills, &combination) {
            Ok(remaining) => can_partition_into_three_equal(&remaining),
            Err(err) => {
                error!(amount, %err, "reconstructed combination does not fit the multiset");
                false
            }
        }
    }

    /// Run the search: targeted when `target` is given, untargeted otherwise.
    /// Results are ascending.
    pub fn find(&self, target: Option<u64>) -> Vec<u64> {
        match target {
            Some(target) => self.near(target),
            None => self.scan(),
        }
    }

    /// Targeted mode: the target itself if valid, otherwise the closest
    /// valid amount below and the closest above (at most one each).
    pub fn near(&self, target: u64) -> Vec<u64> {
        if self.is_candidate(target) {
            return vec![target];
        }

        let below_start = target.saturating_sub(1).min(self.total);

        let below = (1..=below_start)
            .rev()
            .find(|&amount| self.is_candidate(amount));

        let above = (target.saturating_add(1)..self.total).find(|&amount| self.is_candidate(amount));

        debug!(target, ?below, ?above, "proximity search finished");

        below.into_iter().chain(above).collect()
    }

    /// Untargeted mode: nothing when the multiset already splits evenly,
    /// otherwise the first few valid amounts scanning upwards from 1.
    pub fn scan(&self) -> Vec<u64> {
        if self.total % 3 == 0 && can_partition_into_three_equal(self.bills) {
            debug!(total = self.total, "multiset already splits evenly");
            return Vec::new();
        }

        let window_end = self.config.scan_window.min(self.total);
        let limit = self.config.max_candidates;

        let mut found: Vec<u64> = (1..=window_end)
            .filter(|&amount| self.is_candidate(amount))
            .take(limit)
            .collect();

        if found.len() < limit {
            let wanted = limit - found.len();

            found.extend(
                (window_end + 1..self.total)
                    .filter(|&amount| self.is_candidate(amount))
                    .take(wanted),
            );
        }

        debug!(total = self.total, candidates = ?found, "scan finished");

        found
    }
}

/// Find removable amounts that leave an evenly splittable remainder.
///
/// See [`AmountSearch::find`].
pub fn find_candidate_amounts(
    bills: &BillMultiset,
    target: Option<u64>,
    allowed: &DenominationSet,
) -> Vec<u64> {
    AmountSearch::new(bills, allowed).find(target)
}
