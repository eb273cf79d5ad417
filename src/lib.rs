//! Trisect
//!
//! Trisect splits a pile of bills into three stacks of exactly equal value.
//! When no exact split exists it finds small amounts that can be taken out
//! first so that one does.

pub mod bills;
pub mod combination;
pub mod config;
pub mod denominations;
pub mod distribute;
pub mod fixtures;
pub mod logging;
pub mod partition;
pub mod planner;
pub mod prelude;
pub mod removal;
pub mod report;
pub mod request;
pub mod search;
pub mod stats;
