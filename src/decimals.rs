use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Transaction;

/// Mint → decimal scale.
///
/// Used two ways. As a long-lived, caller-owned cache it only grows: entries
/// are never evicted and never overwritten, because a mint's scale cannot
/// change. Per transaction, [`DecimalsTable::confident_for`] layers the
/// transaction's own balance-change evidence over the cache without copying it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecimalsTable(BTreeMap<String, u8>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    Unchanged,
    Conflict { known: u8, observed: u8 },
}

impl DecimalsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, mint: &str) -> Option<u8> {
        self.0.get(mint).copied()
    }

    pub fn contains(&self, mint: &str) -> bool {
        self.0.contains_key(mint)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0
            .iter()
            .map(|(mint, decimals)| (mint.as_str(), *decimals))
    }

    /// Records a scale unless the mint is already known. A differing value is
    /// reported and dropped.
    pub fn insert_if_absent(&mut self, mint: &str, decimals: u8) -> Insertion {
        match self.0.get(mint) {
            Some(&known) if known == decimals => Insertion::Unchanged,
            Some(&known) => Insertion::Conflict {
                known,
                observed: decimals,
            },
            None => {
                self.0.insert(mint.to_string(), decimals);
                Insertion::Inserted
            }
        }
    }

    /// Extends the cache with every scale the transaction reveals. Returns the
    /// number of newly learned mints.
    pub fn absorb(&mut self, tx: &Transaction) -> usize {
        let mut learned = 0;
        for (mint, decimals) in tx.observed_decimals() {
            match self.insert_if_absent(mint, decimals) {
                Insertion::Inserted => learned += 1,
                Insertion::Unchanged => {}
                Insertion::Conflict { known, observed } => {
                    tracing::warn!(
                        signature = %tx.signature,
                        mint,
                        known,
                        observed,
                        "conflicting decimals observed, keeping cached value"
                    );
                }
            }
        }
        learned
    }

    /// The scales reconciliation trusts for one transaction: the
    /// transaction's own observations, falling back to this cache.
    pub fn confident_for<'a>(&'a self, tx: &'a Transaction) -> ConfidentDecimals<'a> {
        ConfidentDecimals {
            observed: tx.observed_decimals().collect(),
            cache: self,
        }
    }
}

/// Read access to mint scales.
pub trait DecimalsLookup {
    fn lookup(&self, mint: &str) -> Option<u8>;
}

impl DecimalsLookup for DecimalsTable {
    fn lookup(&self, mint: &str) -> Option<u8> {
        self.get(mint)
    }
}

/// A borrowed overlay of one transaction's observed scales on top of the
/// shared cache. Later observations of the same mint win.
#[derive(Debug, Clone)]
pub struct ConfidentDecimals<'a> {
    observed: BTreeMap<&'a str, u8>,
    cache: &'a DecimalsTable,
}

impl ConfidentDecimals<'_> {
    pub fn get(&self, mint: &str) -> Option<u8> {
        self.observed
            .get(mint)
            .copied()
            .or_else(|| self.cache.get(mint))
    }

    pub fn contains(&self, mint: &str) -> bool {
        self.get(mint).is_some()
    }
}

impl DecimalsLookup for ConfidentDecimals<'_> {
    fn lookup(&self, mint: &str) -> Option<u8> {
        self.get(mint)
    }
}

impl<S: Into<String>> FromIterator<(S, u8)> for DecimalsTable {
    fn from_iter<I: IntoIterator<Item = (S, u8)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(m, d)| (m.into(), d)).collect())
    }
}
