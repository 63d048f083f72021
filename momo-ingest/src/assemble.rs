//! Merge raw XML attributes with extracted fields into one record.

use std::collections::BTreeMap;

use serde_json::Value;

use momo_core::record::TransactionRecord;
use momo_core::time::epoch_ms_to_iso;

use crate::body::BodyParser;

/// Raw attribute keys dropped when an extracted field of the same name
/// exists; the extracted value wins in the merged record.
const EXTRACTED_KEYS: [&str; 12] = [
    "raw_body",
    "txid",
    "amount",
    "new_balance",
    "fee",
    "sender_name",
    "sender_phone",
    "receiver_name",
    "receiver_phone",
    "action",
    "body_timestamp",
    "id",
];

/// Epoch-millisecond attributes that get a derived `*_iso` companion.
const EPOCH_ATTRS: [&str; 2] = ["date", "date_sent"];

/// Build one record from one `sms` node.
///
/// Never fails: a missing or empty body yields a record with every
/// extracted field absent and `action = unknown`. `position` is the
/// node's 1-based position in the batch, the id of last resort.
pub fn assemble(
    parser: &BodyParser,
    attrs: BTreeMap<String, String>,
    position: usize,
) -> TransactionRecord {
    let body = attrs.get("body").map(String::as_str).unwrap_or("");
    let extracted = parser.parse(body);

    let id = extracted
        .txid
        .clone()
        .or_else(|| attrs.get("date").filter(|d| !d.is_empty()).cloned())
        .unwrap_or_else(|| position.to_string());

    let mut raw: BTreeMap<String, Value> = attrs
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    // Derived timestamp keys exist exactly when the raw attribute does;
    // a failed conversion leaves a null, the raw value stays untouched.
    for key in EPOCH_ATTRS {
        if let Some(ms) = attrs.get(key) {
            let iso = epoch_ms_to_iso(ms).map(Value::String).unwrap_or(Value::Null);
            raw.insert(format!("{key}_iso"), iso);
        }
    }

    for key in EXTRACTED_KEYS {
        raw.remove(key);
    }

    TransactionRecord { extracted, id, raw }
}
