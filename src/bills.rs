//! Bills

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{IgnoredAny, MapAccess, Visitor},
    ser::SerializeMap,
};
use thiserror::Error;

use crate::denominations::Denomination;

/// Errors raised while mutating a bill multiset.
///
/// Both variants indicate a bug in the caller: the search and reconstruction
/// code must never ask for bills that are not there.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillsError {
    /// Removing bills would leave a negative count.
    #[error("cannot remove {requested} x {denomination}: only {available} available")]
    Underflow {
        /// Denomination being removed
        denomination: Denomination,

        /// Bills of that denomination currently held
        available: u32,

        /// Bills requested
        requested: u32,
    },

    /// Adding bills would overflow the count.
    #[error("adding {added} x {denomination} overflows the bill count")]
    Overflow {
        /// Denomination being added
        denomination: Denomination,

        /// Bills being added
        added: u32,
    },
}

/// Counts of bills per denomination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BillMultiset {
    /// Indexed by [`Denomination::index`]
    counts: [u32; 5],
}

impl BillMultiset {
    /// An empty multiset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a multiset from `(denomination, count)` pairs. Repeated
    /// denominations are summed, saturating at `u32::MAX`.
    pub fn from_counts(counts: impl IntoIterator<Item = (Denomination, u32)>) -> Self {
        let mut bills = Self::new();

        for (denom, count) in counts {
            let slot = bills.slot_mut(denom);
            *slot = slot.saturating_add(count);
        }

        bills
    }

    /// Builder-style setter for a single denomination.
    #[must_use]
    pub fn with(mut self, denom: Denomination, count: u32) -> Self {
        self.set_count(denom, count);
        self
    }

    /// Number of bills held for `denom`.
    pub fn count(&self, denom: Denomination) -> u32 {
        self.counts.get(denom.index()).copied().unwrap_or(0)
    }

    /// Overwrite the count for `denom`.
    pub fn set_count(&mut self, denom: Denomination, count: u32) {
        *self.slot_mut(denom) = count;
    }

    /// Add `count` bills of `denom`.
    ///
    /// # Errors
    ///
    /// Returns [`BillsError::Overflow`] if the count would not fit.
    pub fn add(&mut self, denom: Denomination, count: u32) -> Result<(), BillsError> {
        let slot = self.slot_mut(denom);

        *slot = slot.checked_add(count).ok_or(BillsError::Overflow {
            denomination: denom,
            added: count,
        })?;

        Ok(())
    }

    /// Take `count` bills of `denom`.
    ///
    /// # Errors
    ///
    /// Returns [`BillsError::Underflow`] if fewer than `count` bills are held.
    /// The multiset is left untouched in that case.
    pub fn take(&mut self, denom: Denomination, count: u32) -> Result<(), BillsError> {
        let slot = self.slot_mut(denom);

        *slot = slot.checked_sub(count).ok_or(BillsError::Underflow {
            denomination: denom,
            available: *slot,
            requested: count,
        })?;

        Ok(())
    }

    /// Remove every bill of `other` from this multiset.
    ///
    /// The removal is all-or-nothing: every count is checked before any is
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`BillsError::Underflow`] for the first denomination that
    /// would go negative.
    pub fn remove(&mut self, other: &BillMultiset) -> Result<(), BillsError> {
        if let Some((denom, requested)) = other
            .iter_present()
            .find(|&(denom, requested)| self.count(denom) < requested)
        {
            return Err(BillsError::Underflow {
                denomination: denom,
                available: self.count(denom),
                requested,
            });
        }

        for (denom, requested) in other.iter_present() {
            self.take(denom, requested)?;
        }

        Ok(())
    }

    /// Add every bill of `other` to this multiset.
    ///
    /// # Errors
    ///
    /// Returns [`BillsError::Overflow`] if any count would not fit.
    pub fn merge(&mut self, other: &BillMultiset) -> Result<(), BillsError> {
        for (denom, count) in other.iter_present() {
            self.add(denom, count)?;
        }

        Ok(())
    }

    /// Total face value of all bills.
    pub fn total_value(&self) -> u64 {
        self.iter()
            .map(|(denom, count)| denom.value() * u64::from(count))
            .sum()
    }

    /// Total number of bills.
    pub fn bill_count(&self) -> u64 {
        self.counts.iter().copied().map(u64::from).sum()
    }

    /// Check if the multiset holds no bills.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Iterate `(denomination, count)` pairs, highest value first, zero
    /// counts included.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        Denomination::ALL
            .into_iter()
            .zip(self.counts.iter().copied())
    }

    /// Iterate only the denominations with a non-zero count, highest first.
    pub fn iter_present(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        self.iter().filter(|&(_, count)| count > 0)
    }

    /// Flatten into one entry per physical bill, highest value first.
    pub fn expand(&self) -> Vec<Denomination> {
        self.iter_present()
            .flat_map(|(denom, count)| (0..count).map(move |_| denom))
            .collect()
    }

    fn slot_mut(&mut self, denom: Denomination) -> &mut u32 {
        let [hundreds, fifties, twenties, tens, fives] = &mut self.counts;

        match denom {
            Denomination::Hundred => hundreds,
            Denomination::Fifty => fifties,
            Denomination::Twenty => twenties,
            Denomination::Ten => tens,
            Denomination::Five => fives,
        }
    }
}

impl fmt::Display for BillMultiset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;

        for (denom, count) in self.iter_present() {
            if !first {
                f.write_str(", ")?;
            }

            write!(f, "{count} x {denom}")?;
            first = false;
        }

        if first {
            f.write_str("no bills")?;
        }

        Ok(())
    }
}

/// Serialised as a map keyed by every denomination string, lowest value
/// first: `{"5": 6, "10": 6, "20": 4, "50": 0, "100": 1}`.
impl Serialize for BillMultiset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Denomination::ALL.len()))?;

        for denom in Denomination::ALL.into_iter().rev() {
            map.serialize_entry(denom.as_key(), &self.count(denom))?;
        }

        map.end()
    }
}

/// Accepts a map of denomination strings to counts. Keys that are not
/// canonical denominations are ignored, missing keys count as zero.
impl<'de> Deserialize<'de> for BillMultiset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BillMultisetVisitor)
    }
}

struct BillMultisetVisitor;

impl<'de> Visitor<'de> for BillMultisetVisitor {
    type Value = BillMultiset;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of denomination to bill count")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut bills = BillMultiset::new();

        while let Some(key) = access.next_key::<String>()? {
            match Denomination::from_key(&key) {
                Some(denom) => bills.set_count(denom, access.next_value()?),
                None => {
                    access.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(bills)
    }
}
