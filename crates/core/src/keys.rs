//! Normalized identifier newtypes shared across the engine.
//!
//! Keys compare case- and whitespace-insensitively: the raw string is
//! trimmed, internal whitespace runs are collapsed to a single space, and
//! the result is lowercased. A key is valid iff it is non-empty after
//! normalization.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::constants::{CASH_ASSET_KEY, CASH_ASSET_PREFIX};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("Invalid regex pattern");
}

fn normalize(raw: &str) -> String {
    WHITESPACE_RUN
        .replace_all(raw.trim(), " ")
        .to_lowercase()
}

/// Identifier of an asset class ("US Total Market", "Small Cap Value").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AssetKey(String);

impl AssetKey {
    pub fn new(raw: &str) -> Self {
        AssetKey(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }

    /// Whether this key names the cash asset class.
    pub fn is_cash(&self) -> bool {
        self.0 == CASH_ASSET_KEY || self.0.starts_with(CASH_ASSET_PREFIX)
    }
}

impl From<&str> for AssetKey {
    fn from(raw: &str) -> Self {
        AssetKey::new(raw)
    }
}

impl From<String> for AssetKey {
    fn from(raw: String) -> Self {
        AssetKey::new(&raw)
    }
}

impl From<AssetKey> for String {
    fn from(key: AssetKey) -> Self {
        key.0
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Maps keyed by AssetKey can be queried with pre-normalized &str.
impl Borrow<str> for AssetKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier of an account ("Roth IRA", "Taxable Brokerage").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AccountKey(String);

impl AccountKey {
    pub fn new(raw: &str) -> Self {
        AccountKey(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }
}

impl From<&str> for AccountKey {
    fn from(raw: &str) -> Self {
        AccountKey::new(raw)
    }
}

impl From<String> for AccountKey {
    fn from(raw: String) -> Self {
        AccountKey::new(&raw)
    }
}

impl From<AccountKey> for String {
    fn from(key: AccountKey) -> Self {
        key.0
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AccountKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier of a concrete security (ticker symbol).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SecurityKey(String);

impl SecurityKey {
    pub fn new(raw: &str) -> Self {
        SecurityKey(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }
}

impl From<&str> for SecurityKey {
    fn from(raw: &str) -> Self {
        SecurityKey::new(raw)
    }
}

impl From<String> for SecurityKey {
    fn from(raw: String) -> Self {
        SecurityKey::new(&raw)
    }
}

impl From<SecurityKey> for String {
    fn from(key: SecurityKey) -> Self {
        key.0
    }
}

impl fmt::Display for SecurityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SecurityKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}
