//! Planner
//!
//! End-to-end flows over one request: remove a target and split what is
//! left, offer removal options when no even split exists, and check a split
//! up front.

use serde::Serialize;
use thiserror::Error;
use tracing::{Span, debug};

use crate::{
    bills::BillMultiset,
    combination::{Combination, Removal, RemovalError, apply, build_combination, describe, remove_amount},
    denominations::DenominationSet,
    distribute::distribute,
    partition::split_into_three_equal,
    request::SplitRequest,
    search::AmountSearch,
    stats::{StackStats, summarize, summarize_groups},
};

/// Errors raised while planning a split.
///
/// Every variant points at a bug in the engine rather than bad input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// Removing bills failed.
    #[error(transparent)]
    Removal(#[from] RemovalError),

    /// The stacks do not account for every remaining bill.
    #[error("stacks hold ${actual} but ${expected} remained")]
    StacksMismatch {
        /// Value left after removal
        expected: u64,

        /// Value across the three stacks
        actual: u64,
    },
}

/// Result of removing the target and splitting the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfectSplit {
    /// Bills taken out, if a target was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removal: Option<Removal>,

    /// The three stacks
    pub stacks: Vec<StackStats>,
}

/// One way of removing bills so that the rest splits evenly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtractionOption {
    /// Total left after removal
    pub new_total: u64,

    /// Amount removed
    pub amount_subtracted: u64,

    /// Bills removed
    pub combination: Combination,

    /// Readable summary of `combination`
    pub description: String,

    /// Whether `combination` came from the greedy fallback
    pub degraded: bool,

    /// The three stacks after removal
    pub stack_stats: Vec<StackStats>,
}

/// Answer to "can these bills be split after removing an amount?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitCheck {
    /// Whether the remaining total is a multiple of three
    pub divisible_by_three: bool,

    /// Whether three stacks of exactly equal value exist
    pub evenly_distributable: bool,

    /// Total left after removal, or the original total if removal failed
    pub total_amount: u64,

    /// Bills left after removal, or all bills if removal failed
    pub total_bills: u64,

    /// Why the split is not possible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// One exact split, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacks: Option<Vec<StackStats>>,
}

/// Remove the request's target, then split what is left into three stacks.
///
/// The target is removed using every denomination; the request's allow-list
/// only applies to [`plan_imperfect`]. A zero or missing target removes
/// nothing. A target with no exact combination is removed greedily and the
/// result is marked [`Removal::Degraded`].
///
/// # Errors
///
/// Returns a [`PlanError`] if removal or distribution breaks an invariant.
#[tracing::instrument(
    name = "planner.plan_perfect",
    skip(request),
    fields(
        total = request.total(),
        target = ?request.target_amount,
        degraded = tracing::field::Empty
    ),
    err
)]
pub fn plan_perfect(request: &SplitRequest) -> Result<PerfectSplit, PlanError> {
    let (remaining, removal) = match request.target_amount.filter(|&target| target > 0) {
        Some(target) => {
            let (remaining, removal) =
                remove_amount(&request.bills, target, &DenominationSet::all())?;

            Span::current().record("degraded", removal.is_degraded());

            (remaining, Some(removal))
        }
        None => (request.bills, None),
    };

    let stacks = split(&remaining)?;

    Ok(PerfectSplit { removal, stacks })
}

/// List the removal options that leave an evenly splittable remainder.
///
/// Candidates come from [`AmountSearch`] using the request's target and
/// allow-list, and are returned in ascending order of amount. An empty list
/// means either that the bills already split evenly or that no option
/// exists.
///
/// # Errors
///
/// Returns a [`PlanError`] if removal or distribution breaks an invariant.
#[tracing::instrument(
    name = "planner.plan_imperfect",
    skip(request),
    fields(
        total = request.total(),
        target = ?request.target_amount,
        options = tracing::field::Empty
    ),
    err
)]
pub fn plan_imperfect(request: &SplitRequest) -> Result<Vec<SubtractionOption>, PlanError> {
    let allowed = request.allowed();
    let search = AmountSearch::new(&request.bills, &allowed);
    let amounts = search.find(request.target_amount.filter(|&target| target > 0));

    Span::current().record("options", amounts.len());

    amounts
        .into_iter()
        .map(|amount| -> Result<SubtractionOption, PlanError> {
            let (remaining, removal) = remove_amount(&request.bills, amount, &allowed)?;
            let combination = *removal.removed();

            Ok(SubtractionOption {
                new_total: remaining.total_value(),
                amount_subtracted: amount,
                combination,
                description: describe(Some(&combination)),
                degraded: removal.is_degraded(),
                stack_stats: split(&remaining)?,
            })
        })
        .collect()
}

/// Check whether `bills`, after removing `subtract` with `allowed`
/// denominations, can be split into three stacks of equal value.
///
/// # Errors
///
/// Returns a [`PlanError`] if the reconstructed removal does not fit the
/// bills.
pub fn check_split(
    bills: &BillMultiset,
    subtract: u64,
    allowed: &DenominationSet,
) -> Result<SplitCheck, PlanError> {
    let Some(combination) = build_combination(bills, subtract, allowed) else {
        return Ok(SplitCheck {
            divisible_by_three: false,
            evenly_distributable: false,
            total_amount: bills.total_value(),
            total_bills: bills.bill_count(),
            reason: Some(format!(
                "Cannot subtract ${subtract} with available bills (using only allowed denominations)"
            )),
            stacks: None,
        });
    };

    let remaining = apply(bills, &combination)?;
    let total = remaining.total_value();

    let mut check = SplitCheck {
        divisible_by_three: total % 3 == 0,
        evenly_distributable: false,
        total_amount: total,
        total_bills: remaining.bill_count(),
        reason: None,
        stacks: None,
    };

    if !check.divisible_by_three {
        check.reason = Some(format!("Remaining total ${total} is not divisible by 3"));
    } else if let Some(stacks) = split_into_three_equal(&remaining) {
        check.evenly_distributable = true;
        check.stacks = Some(summarize_groups(&stacks));
    } else {
        check.reason = Some(format!(
            "Cannot split ${total} into three stacks of ${} each",
            total / 3
        ));
    }

    debug!(
        subtract,
        total,
        evenly_distributable = check.evenly_distributable,
        "split check finished"
    );

    Ok(check)
}

/// Distribute `bills` and summarize, making sure nothing went missing.
fn split(bills: &BillMultiset) -> Result<Vec<StackStats>, PlanError> {
    let stats = summarize(&distribute(bills));
    let expected = bills.total_value();
    let actual = stats.iter().map(|stat| stat.value).sum();

    if actual != expected {
        return Err(PlanError::StacksMismatch { expected, actual });
    }

    Ok(stats)
}
