//! # Core Domain Entities
//!
//! Records exchanged with the node and held in module state.
//!
//! ## Clusters
//!
//! - **History**: `TxRecord`, `TxCategory`, `BlockMeta`
//! - **Governance**: `ProposalId`, `DepositRecord`, `Coin`
//! - **Identity**: `Address`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::errors::EntityError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Block height (sequential block number).
pub type Height = u64;

/// Bech32 wallet address as handed out by the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Governance proposal identifier.
///
/// Proposal ids travel as decimal strings over the wire, so they are kept as
/// strings and never reinterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(pub String);

impl ProposalId {
    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProposalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for ProposalId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

// =============================================================================
// CLUSTER B: TRANSACTION HISTORY
// =============================================================================

/// The three history categories a wallet's transactions are stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxCategory {
    /// Delegations, redelegations and unbondings.
    Staking,
    /// Proposal submissions, deposits and votes.
    Governance,
    /// Plain sends and receives.
    Wallet,
}

impl TxCategory {
    /// All categories, in the order their lists are concatenated.
    pub const ALL: [TxCategory; 3] = [TxCategory::Staking, TxCategory::Governance, TxCategory::Wallet];

    /// Lowercase name used on the wire and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxCategory::Staking => "staking",
            TxCategory::Governance => "governance",
            TxCategory::Wallet => "wallet",
        }
    }
}

impl fmt::Display for TxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxCategory {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staking" => Ok(TxCategory::Staking),
            "governance" => Ok(TxCategory::Governance),
            "wallet" => Ok(TxCategory::Wallet),
            other => Err(EntityError::UnknownCategory(other.to_string())),
        }
    }
}

/// A transaction as returned by the node, optionally tagged and time-stamped.
///
/// `tx` and `result` are kept as raw JSON: the history layer never looks
/// inside them, the view layer does.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxRecord {
    /// Block height, accepted as number or decimal string.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub height: Height,
    /// Category tag, set when the record is filed under a category.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TxCategory>,
    /// Content hash, the dedup key.
    pub txhash: String,
    /// Raw transaction body.
    #[serde(default)]
    pub tx: serde_json::Value,
    /// Raw execution result (gas, tags).
    #[serde(default)]
    pub result: serde_json::Value,
    /// Block time in epoch milliseconds, absent until enriched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

impl TxRecord {
    /// Minimal record with empty payloads.
    pub fn new(txhash: impl Into<String>, height: Height) -> Self {
        Self {
            height,
            category: None,
            txhash: txhash.into(),
            tx: serde_json::Value::Null,
            result: serde_json::Value::Null,
            time: None,
        }
    }

    /// Return this record tagged with `category`.
    pub fn tagged(mut self, category: TxCategory) -> Self {
        self.category = Some(category);
        self
    }
}

/// Header fields of a block the history layer cares about.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeaderInfo {
    /// Block height.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub height: Height,
    /// Canonical block time, ISO-8601.
    pub time: String,
}

/// Block metadata keyed by height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMeta {
    /// Block header.
    pub header: BlockHeaderInfo,
}

impl BlockMeta {
    /// Build metadata for `height` with an ISO-8601 `time`.
    pub fn new(height: Height, time: impl Into<String>) -> Self {
        Self {
            header: BlockHeaderInfo {
                height,
                time: time.into(),
            },
        }
    }
}

// =============================================================================
// CLUSTER C: GOVERNANCE
// =============================================================================

/// An amount of a single denomination. Amounts stay strings to avoid
/// precision loss on large integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination, e.g. `stake`.
    pub denom: String,
    /// Integer amount as a decimal string.
    pub amount: String,
}

impl Coin {
    /// Create a coin.
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

/// A deposit attached to a governance proposal.
///
/// Fields other than `depositor` and `amount` are preserved untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRecord {
    /// Address of the depositor.
    pub depositor: String,
    /// Deposited coins.
    #[serde(default)]
    pub amount: Vec<Coin>,
    /// Anything else the node sent along.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DepositRecord {
    /// Create a deposit record with no extra fields.
    pub fn new(depositor: impl Into<String>, amount: Vec<Coin>) -> Self {
        Self {
            depositor: depositor.into(),
            amount,
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_accepts_string_and_number() {
        let from_str: TxRecord =
            serde_json::from_str(r#"{"height":"170","txhash":"AB"}"#).unwrap();
        let from_num: TxRecord = serde_json::from_str(r#"{"height":170,"txhash":"AB"}"#).unwrap();
        assert_eq!(from_str.height, 170);
        assert_eq!(from_str, from_num);
        assert!(from_str.time.is_none());
        assert!(from_str.category.is_none());
    }

    #[test]
    fn test_category_serializes_as_type() {
        let record = TxRecord::new("AB", 1).tagged(TxCategory::Governance);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "governance");
        assert!(json.get("time").is_none());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("staking".parse::<TxCategory>().unwrap(), TxCategory::Staking);
        assert_eq!("wallet".parse::<TxCategory>().unwrap(), TxCategory::Wallet);
        let err = "bonding".parse::<TxCategory>().unwrap_err();
        assert!(err.to_string().contains("Unknown transaction type"));
    }

    #[test]
    fn test_category_order() {
        assert_eq!(
            TxCategory::ALL.map(|c| c.as_str()),
            ["staking", "governance", "wallet"]
        );
    }

    #[test]
    fn test_deposit_keeps_extra_fields() {
        let json = r#"{"depositor":"cosmos1x","amount":[{"denom":"stake","amount":"15"}],"proposal_id":"2"}"#;
        let deposit: DepositRecord = serde_json::from_str(json).unwrap();
        assert_eq!(deposit.amount, vec![Coin::new("stake", "15")]);
        assert_eq!(deposit.extra["proposal_id"], "2");
    }

    #[test]
    fn test_block_meta_parses_header_time() {
        let meta: BlockMeta =
            serde_json::from_str(r#"{"header":{"height":"42","time":"2021-01-01T00:00:00Z"}}"#)
                .unwrap();
        assert_eq!(meta, BlockMeta::new(42, "2021-01-01T00:00:00Z"));
    }
}
