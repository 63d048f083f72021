//! Record types for extracted mobile-money transactions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse transaction type recovered from the message wording
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Action {
    #[serde(rename = "received")]
    Received,
    #[serde(rename = "payment")]
    Payment,
    #[serde(rename = "transfer")]
    Transfer,
    #[serde(rename = "deposit")]
    Deposit,
    #[serde(rename = "unknown")]
    #[default]
    Unknown,
}

impl Action {
    /// Classify a message body by keyword priority; first match wins.
    ///
    /// The order is a deliberate tie-break: a body mentioning both
    /// "received" and "your payment" classifies as `Received`.
    pub fn classify(body: &str) -> Action {
        let b = body.to_lowercase();
        if b.contains("received") {
            Action::Received
        } else if b.contains("your payment") {
            Action::Payment
        } else if b.contains("transferred to") {
            Action::Transfer
        } else if b.contains("deposit") {
            Action::Deposit
        } else {
            Action::Unknown
        }
    }

    /// Wire-format label, matching the serde representation
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Received => "received",
            Action::Payment => "payment",
            Action::Transfer => "transfer",
            Action::Deposit => "deposit",
            Action::Unknown => "unknown",
        }
    }
}

/// Fields recovered from one message body.
///
/// Everything except `raw_body` and `action` is optional: an absent
/// value means the pattern did not match, which is an expected outcome,
/// not an error. Absent fields serialize as `null` so every output
/// object has the same shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractedFields {
    /// Verbatim (trimmed) original body text
    pub raw_body: String,
    /// Opaque transaction identifier, kept as text
    pub txid: Option<String>,
    /// Amount in whole RWF
    pub amount: Option<i64>,
    pub new_balance: Option<i64>,
    pub fee: Option<i64>,
    pub sender_name: Option<String>,
    pub sender_phone: Option<String>,
    pub receiver_name: Option<String>,
    pub receiver_phone: Option<String>,
    pub action: Action,
    /// First "YYYY-MM-DD HH:MM:SS" substring in the body, if any
    pub body_timestamp: Option<String>,
}

/// One normalized output record: the raw XML attributes, derived ISO
/// timestamps where epoch attributes were present, the extracted
/// fields, and a non-empty `id`.
///
/// `id` is the extracted txid when present, else the raw `date`
/// attribute, else the record's 1-based position in the batch.
/// Uniqueness is best-effort, derived from source data, and not
/// enforced here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    #[serde(flatten)]
    pub extracted: ExtractedFields,
    pub id: String,
    /// Raw XML attributes plus `date_iso`/`date_sent_iso`, minus any
    /// key shadowed by an extracted field. Declared last so it captures
    /// the leftover keys on deserialization.
    #[serde(flatten)]
    pub raw: BTreeMap<String, Value>,
}
