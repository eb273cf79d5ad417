//! Split requests
//!
//! Translation between the JSON body the form layer sends and the engine's
//! inputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{bills::BillMultiset, denominations::DenominationSet};

/// Errors raised while reading or validating a request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The body is not valid JSON or has the wrong shape.
    #[error("invalid request body: {0}")]
    Json(#[from] serde_json::Error),

    /// The target amount is larger than half of the total, which the form
    /// layer does not accept.
    #[error("target amount ${target} exceeds half of the total (${total})")]
    TargetExceedsHalf {
        /// Requested target amount
        target: u64,

        /// Total value of the bills
        total: u64,
    },
}

/// A bill count plus optional removal target and denomination allow-list.
///
/// Counts sit at the top level keyed by denomination (`"5"`, `"10"`, ...).
/// Unknown keys are ignored and missing counts are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRequest {
    /// Bills counted
    #[serde(flatten)]
    pub bills: BillMultiset,

    /// Amount the caller would like to remove
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<u64>,

    /// Denominations that may be removed; absent means all of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_denominations: Option<BTreeMap<String, bool>>,
}

impl SplitRequest {
    /// A request for `bills` with no target and no restriction.
    pub fn new(bills: BillMultiset) -> Self {
        Self {
            bills,
            ..Self::default()
        }
    }

    /// Parse a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Json`] if the body is malformed, including
    /// negative or fractional counts.
    pub fn from_json(body: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Total value of the bills.
    pub fn total(&self) -> u64 {
        self.bills.total_value()
    }

    /// Denominations that may be removed.
    pub fn allowed(&self) -> DenominationSet {
        self.allowed_denominations
            .as_ref()
            .map_or_else(DenominationSet::all, |map| {
                DenominationSet::from_allow_map(
                    map.iter().map(|(key, allowed)| (key.as_str(), *allowed)),
                )
            })
    }

    /// The form layer's policy: a target may not exceed half of the total.
    ///
    /// The engine itself accepts any target and reports infeasibility
    /// instead, so this is only called by front ends that want the policy.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::TargetExceedsHalf`] if the target is too large.
    pub fn check_target_policy(&self) -> Result<(), RequestError> {
        let total = self.total();

        match self.target_amount {
            Some(target) if target.saturating_mul(2) > total => {
                Err(RequestError::TargetExceedsHalf { target, total })
            }
            _ => Ok(()),
        }
    }
}
