//! Stack statistics

use serde::Serialize;

use crate::{bills::BillMultiset, distribute::Stack};

/// Per-stack totals for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackStats {
    /// 1-based position of the stack
    pub index: usize,

    /// Total face value
    pub value: u64,

    /// Number of bills
    pub bill_count: u64,

    /// Bills per denomination
    pub distribution: BillMultiset,
}

/// Summarize stacks in input order.
pub fn summarize(stacks: &[Stack]) -> Vec<StackStats> {
    summarize_groups(stacks.iter().map(Stack::bills))
}

/// Summarize plain bill groups in input order.
pub fn summarize_groups<'a>(
    groups: impl IntoIterator<Item = &'a BillMultiset>,
) -> Vec<StackStats> {
    groups
        .into_iter()
        .enumerate()
        .map(|(idx, bills)| StackStats {
            index: idx + 1,
            value: bills.total_value(),
            bill_count: bills.bill_count(),
            distribution: *bills,
        })
        .collect()
}

/// Difference between the most and least valuable stacks.
pub fn spread(stats: &[StackStats]) -> u64 {
    let max = stats.iter().map(|stat| stat.value).max().unwrap_or(0);
    let min = stats.iter().map(|stat| stat.value).min().unwrap_or(0);

    max - min
}
