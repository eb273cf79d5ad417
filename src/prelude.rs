//! Trisect prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bills::{BillMultiset, BillsError},
    combination::{
        Combination, Removal, RemovalError, apply, build_combination, describe, remove_amount,
    },
    denominations::{Denomination, DenominationError, DenominationSet},
    distribute::{RefineConfig, RefineReport, Stack, distribute, distribute_with},
    fixtures::{BillsFixture, Fixture, FixtureError},
    partition::{can_partition_into_three_equal, split_into_three_equal},
    planner::{
        PerfectSplit, PlanError, SplitCheck, SubtractionOption, check_split, plan_imperfect,
        plan_perfect,
    },
    removal::can_remove,
    request::{RequestError, SplitRequest},
    search::{AmountSearch, SearchConfig, find_candidate_amounts},
    stats::{StackStats, summarize, summarize_groups},
};
