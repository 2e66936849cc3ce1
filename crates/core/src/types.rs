//! Common types

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

pub use alloy_primitives::{Address, U256};
pub use paypool_tree::Hash;

/// Token amount, a Solidity `uint256`
pub type Amount = U256;

/// Payment cycle identifier
pub type Cycle = u64;

/// One recipient's cumulative amount after aggregation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentEntry {
    /// Recipient address
    #[serde(alias = "payee")]
    pub recipient: Address,
    /// Cumulative amount paid to the recipient across all cycles
    pub amount: Amount,
}

impl PaymentEntry {
    /// Create a new entry
    pub const fn new(recipient: Address, amount: Amount) -> Self {
        Self { recipient, amount }
    }
}

/// Payment as supplied by a caller, before filtering and aggregation.
///
/// Either field may be missing. Such entries, and entries with a zero
/// amount, never reach the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPayment {
    /// Recipient address
    #[serde(default, alias = "payee", deserialize_with = "lenient_address")]
    pub recipient: Option<Address>,
    /// Amount credited by this entry
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<Amount>,
}

impl RawPayment {
    /// Create a raw payment with both fields present
    pub const fn new(recipient: Address, amount: Amount) -> Self {
        Self { recipient: Some(recipient), amount: Some(amount) }
    }

    /// The entry if it carries a recipient and a non-zero amount
    pub fn entry(&self) -> Option<PaymentEntry> {
        match (self.recipient, self.amount) {
            (Some(recipient), Some(amount)) if !amount.is_zero() => {
                Some(PaymentEntry { recipient, amount })
            }
            _ => None,
        }
    }
}

impl From<PaymentEntry> for RawPayment {
    fn from(entry: PaymentEntry) -> Self {
        Self::new(entry.recipient, entry.amount)
    }
}

/// Amount as found in JSON payment lists: a number or a decimal/`0x` string
#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Number(u64),
    Text(String),
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<Amount>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<AmountRepr>::deserialize(deserializer)? {
        Some(AmountRepr::Number(n)) => Ok(Some(U256::from(n))),
        Some(AmountRepr::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(AmountRepr::Text(s)) => s.trim().parse::<Amount>().map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}

fn lenient_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<Address>().map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}
