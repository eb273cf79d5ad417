//! Distribution
//!
//! Assigns individual bills to three stacks: a greedy load-balancing pass
//! followed by a bounded local search that moves single bills from the
//! richest stack to the poorest.

use tracing::{debug, trace};

use crate::{bills::BillMultiset, denominations::Denomination};

/// Number of stacks bills are split into.
pub const STACK_COUNT: usize = 3;

/// One of the three output stacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stack {
    bills: BillMultiset,
    value: u64,
    bill_count: u64,
}

impl Stack {
    /// Bills in the stack.
    pub fn bills(&self) -> &BillMultiset {
        &self.bills
    }

    /// Total face value of the stack.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Number of bills in the stack.
    pub fn bill_count(&self) -> u64 {
        self.bill_count
    }

    fn push(&mut self, denom: Denomination) {
        // A stack never holds more bills of one denomination than the source
        // multiset, which already fits in a `u32`.
        self.bills
            .set_count(denom, self.bills.count(denom).saturating_add(1));
        self.value += denom.value();
        self.bill_count += 1;
    }

    /// Move one `denom` bill onto `other`. Returns `false`, changing
    /// nothing, if this stack holds none.
    fn transfer(&mut self, other: &mut Stack, denom: Denomination) -> bool {
        if self.bills.take(denom, 1).is_err() {
            return false;
        }

        self.value -= denom.value();
        self.bill_count -= 1;
        other.push(denom);

        true
    }
}

/// Limits for the refinement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefineConfig {
    /// Upper bound on refinement iterations.
    pub max_iterations: usize,

    /// A max/min value gap at or below this is considered balanced.
    pub tolerance: u64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 50,
        }
    }
}

/// Summary of a refinement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefineReport {
    /// Iterations started
    pub iterations: usize,

    /// Bills moved between stacks
    pub moves: usize,

    /// Max minus min stack value after refinement
    pub gap: u64,

    /// Whether the gap ended within tolerance
    pub converged: bool,
}

/// Distribute `bills` into three stacks with the default refinement limits.
///
/// The union of the stacks is always exactly `bills`.
pub fn distribute(bills: &BillMultiset) -> [Stack; STACK_COUNT] {
    distribute_with(bills, &RefineConfig::default()).0
}

/// Distribute `bills` and report on the refinement pass.
pub fn distribute_with(
    bills: &BillMultiset,
    config: &RefineConfig,
) -> ([Stack; STACK_COUNT], RefineReport) {
    let mut stacks = greedy_assign(bills);
    let report = refine(&mut stacks, config);

    debug!(
        values = ?stacks.map(|stack| stack.value),
        iterations = report.iterations,
        moves = report.moves,
        gap = report.gap,
        "distribution finished"
    );

    (stacks, report)
}

/// Greedy pass: bills largest first, each onto the stack with the lowest
/// value, ties going to the stack with fewest bills, then the lowest index.
pub fn greedy_assign(bills: &BillMultiset) -> [Stack; STACK_COUNT] {
    let mut stacks = [Stack::default(); STACK_COUNT];

    for denom in bills.expand() {
        let target = stacks
            .iter_mut()
            .enumerate()
            .min_by_key(|(idx, stack)| (stack.value, stack.bill_count, *idx))
            .map(|(_, stack)| stack);

        if let Some(stack) = target {
            stack.push(denom);
        }
    }

    stacks
}

/// Bounded local search: repeatedly move one bill from the highest-valued
/// stack to the lowest-valued one, as long as the move does not push the
/// poorer stack past the richer one.
///
/// Stops when the gap is within tolerance, when no single-bill move helps,
/// or after `max_iterations`. The gap never increases.
pub fn refine(stacks: &mut [Stack; STACK_COUNT], config: &RefineConfig) -> RefineReport {
    let mut iterations = 0;
    let mut moves = 0;

    while iterations < config.max_iterations {
        let (richest, poorest) = extremes(stacks);
        let gap = value_at(stacks, richest) - value_at(stacks, poorest);

        if gap <= config.tolerance {
            break;
        }

        iterations += 1;

        let Some((from, to)) = pair_mut(stacks, richest, poorest) else {
            break;
        };

        let moved = Denomination::ALL.into_iter().find(|&denom| {
            from.bills.count(denom) > 0
                && from.value - denom.value() >= to.value + denom.value()
                && from.transfer(to, denom)
        });

        match moved {
            Some(denom) => {
                trace!(%denom, from = richest, to = poorest, "moved bill");
                moves += 1;
            }
            None => break,
        }
    }

    let (richest, poorest) = extremes(stacks);
    let gap = value_at(stacks, richest) - value_at(stacks, poorest);

    RefineReport {
        iterations,
        moves,
        gap,
        converged: gap <= config.tolerance,
    }
}

/// Index of the first stack with the highest value and of the first stack
/// with the lowest value.
fn extremes(stacks: &[Stack]) -> (usize, usize) {
    let richest = stacks
        .iter()
        .enumerate()
        .max_by_key(|(idx, stack)| (stack.value, std::cmp::Reverse(*idx)))
        .map_or(0, |(idx, _)| idx);

    let poorest = stacks
        .iter()
        .enumerate()
        .min_by_key(|(idx, stack)| (stack.value, *idx))
        .map_or(0, |(idx, _)| idx);

    (richest, poorest)
}

fn value_at(stacks: &[Stack], idx: usize) -> u64 {
    stacks.get(idx).map_or(0, Stack::value)
}

/// Borrow two distinct stacks mutably.
fn pair_mut(stacks: &mut [Stack], from: usize, to: usize) -> Option<(&mut Stack, &mut Stack)> {
    if from < to {
        let (head, tail) = stacks.split_at_mut(to);
        Some((head.get_mut(from)?, tail.first_mut()?))
    } else if to < from {
        let (head, tail) = stacks.split_at_mut(from);
        let to_stack = head.get_mut(to)?;
        Some((tail.first_mut()?, to_stack))
    } else {
        None
    }
}
