//! Wash-sale lookback domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::keys::{AssetKey, SecurityKey};

/// A recent purchase of one security, used only for wash-sale lookback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInfo {
    pub security: SecurityKey,
    pub share_count: f64,
    pub share_basis: f64,
    pub purchased_at: NaiveDate,
}

impl PurchaseInfo {
    pub fn basis_value(&self) -> f64 {
        self.share_count * self.share_basis
    }
}

/// A recent realized transaction in an asset class. Negative share counts
/// are actual sales; positions opened in the window have positive counts
/// and are ignored by the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizedTransaction {
    pub asset: AssetKey,
    pub security: SecurityKey,
    pub share_count: f64,
    pub short_term_gain_loss: f64,
    pub long_term_gain_loss: f64,
    pub traded_at: NaiveDate,
}

impl RealizedTransaction {
    pub fn realized_gain_loss(&self) -> f64 {
        self.short_term_gain_loss + self.long_term_gain_loss
    }
}

/// Groups of securities tracking the same index (competing ETFs), treated
/// as interchangeable for wash-sale purposes.
#[derive(Debug, Clone, Default)]
pub struct TrackerGroups {
    groups: Vec<Vec<SecurityKey>>,
    index: HashMap<SecurityKey, usize>,
}

impl TrackerGroups {
    pub fn new(groups: Vec<Vec<SecurityKey>>) -> Self {
        let mut index = HashMap::new();
        for (group_index, group) in groups.iter().enumerate() {
            for security in group {
                index.insert(security.clone(), group_index);
            }
        }
        TrackerGroups { groups, index }
    }

    /// The set of securities substantially identical to `security`,
    /// including itself. Ungrouped securities are equivalent only to
    /// themselves.
    pub fn equivalents(&self, security: &SecurityKey) -> HashSet<SecurityKey> {
        match self.index.get(security) {
            Some(group_index) => self.groups[*group_index].iter().cloned().collect(),
            None => HashSet::from([security.clone()]),
        }
    }
}
