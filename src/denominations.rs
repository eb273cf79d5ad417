//! Denominations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Errors raised while parsing a denomination.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DenominationError {
    /// The value is not one of the five canonical bill values.
    #[error("unknown denomination: {0}")]
    Unknown(String),
}

/// A bank note value.
///
/// Variants are declared in ascending order so the derived [`Ord`] follows
/// face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Denomination {
    /// $5 bill
    Five,

    /// $10 bill
    Ten,

    /// $20 bill
    Twenty,

    /// $50 bill
    Fifty,

    /// $100 bill
    Hundred,
}

impl Denomination {
    /// Every denomination, highest value first.
    pub const ALL: [Denomination; 5] = [
        Denomination::Hundred,
        Denomination::Fifty,
        Denomination::Twenty,
        Denomination::Ten,
        Denomination::Five,
    ];

    /// Face value of the bill.
    pub const fn value(self) -> u64 {
        match self {
            Denomination::Five => 5,
            Denomination::Ten => 10,
            Denomination::Twenty => 20,
            Denomination::Fifty => 50,
            Denomination::Hundred => 100,
        }
    }

    /// Position of the denomination within [`Denomination::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Denomination::Hundred => 0,
            Denomination::Fifty => 1,
            Denomination::Twenty => 2,
            Denomination::Ten => 3,
            Denomination::Five => 4,
        }
    }

    /// Look up a denomination by face value.
    pub fn from_value(value: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|denom| denom.value() == value)
    }

    /// Look up a denomination by its exact wire key. Unlike [`FromStr`],
    /// no whitespace, `$` prefix or leading zeros are accepted.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|denom| denom.as_key() == key)
    }

    /// The wire key for this denomination (`"5"`, `"10"`, ...).
    pub const fn as_key(self) -> &'static str {
        match self {
            Denomination::Five => "5",
            Denomination::Ten => "10",
            Denomination::Twenty => "20",
            Denomination::Fifty => "50",
            Denomination::Hundred => "100",
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.value())
    }
}

impl FromStr for Denomination {
    type Err = DenominationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('$');

        trimmed
            .parse::<u64>()
            .ok()
            .and_then(Denomination::from_value)
            .ok_or_else(|| DenominationError::Unknown(s.to_string()))
    }
}

impl TryFrom<String> for Denomination {
    type Error = DenominationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Denomination> for String {
    fn from(denom: Denomination) -> Self {
        denom.as_key().to_string()
    }
}

/// An ordered allow-list of denominations.
///
/// Always sorted highest value first with no duplicates, which the removal
/// search relies on for pruning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenominationSet {
    denominations: SmallVec<[Denomination; 5]>,
}

impl DenominationSet {
    /// All five denominations.
    pub fn all() -> Self {
        Self {
            denominations: Denomination::ALL.into_iter().collect(),
        }
    }

    /// An allow-list with no denominations at all.
    pub fn none() -> Self {
        Self {
            denominations: SmallVec::new(),
        }
    }

    /// Build a set from any list of denominations, normalising the order.
    pub fn new(denominations: impl IntoIterator<Item = Denomination>) -> Self {
        let mut denominations: SmallVec<[Denomination; 5]> = denominations.into_iter().collect();

        denominations.sort_unstable_by(|a, b| b.cmp(a));
        denominations.dedup();

        Self { denominations }
    }

    /// Build a set from a `denomination -> allowed` map, as sent by the form
    /// layer. Keys that are not canonical denominations are ignored.
    pub fn from_allow_map<'a>(entries: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        Self::new(
            entries
                .into_iter()
                .filter(|(_, allowed)| *allowed)
                .filter_map(|(key, _)| Denomination::from_key(key)),
        )
    }

    /// Iterate highest value first.
    pub fn iter(&self) -> impl Iterator<Item = Denomination> + '_ {
        self.denominations.iter().copied()
    }

    /// Denominations as a slice, highest value first.
    pub fn as_slice(&self) -> &[Denomination] {
        &self.denominations
    }

    /// Whether the set contains `denom`.
    pub fn contains(&self, denom: Denomination) -> bool {
        self.denominations.contains(&denom)
    }

    /// Number of denominations in the set.
    pub fn len(&self) -> usize {
        self.denominations.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.denominations.is_empty()
    }

    /// Greatest common divisor of the face values in the set, or `None` for
    /// an empty set. Every removable amount is a multiple of this step.
    pub fn step(&self) -> Option<u64> {
        self.iter().map(Denomination::value).reduce(gcd)
    }
}

impl Default for DenominationSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Denomination> for DenominationSet {
    fn from_iter<I: IntoIterator<Item = Denomination>>(iter: I) -> Self {
        Self::new(iter)
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}
