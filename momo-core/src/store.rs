//! JSON persistence and lookup for the extracted record set.
//!
//! The collection is owned and passed explicitly; nothing in this
//! workspace keeps module-level mutable state.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::record::TransactionRecord;

/// Column order for the normalized CSV export.
const CSV_COLUMNS: [&str; 12] = [
    "id",
    "date_iso",
    "action",
    "amount",
    "fee",
    "new_balance",
    "sender_name",
    "sender_phone",
    "receiver_name",
    "receiver_phone",
    "txid",
    "body_timestamp",
];

/// Serialize the full ordered batch to pretty JSON in one shot.
///
/// Serialization happens before the file is touched, so a failed run
/// never leaves a partial batch behind. Non-ASCII text is written
/// unescaped.
pub fn save_records(path: impl AsRef<Path>, records: &[TransactionRecord]) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// An owned, ordered collection of transaction records.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<TransactionRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    /// Load a record set previously written by [`save_records`].
    ///
    /// Tolerates sparse objects: records inserted by downstream tools
    /// may carry only a subset of the extracted keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let records: Vec<TransactionRecord> =
            serde_json::from_str(&json).with_context(|| format!("parse {}", path.display()))?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Linear scan, first match.
    pub fn find(&self, id: &str) -> Option<&TransactionRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Hash index over record ids.
///
/// A duplicated id keeps the first record in document order, matching
/// what the linear scan returns.
pub struct RecordIndex<'a> {
    by_id: HashMap<&'a str, &'a TransactionRecord>,
}

impl<'a> RecordIndex<'a> {
    pub fn build(set: &'a RecordSet) -> Self {
        let mut by_id = HashMap::with_capacity(set.len());
        for record in set.records() {
            by_id.entry(record.id.as_str()).or_insert(record);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a TransactionRecord> {
        self.by_id.get(id).copied()
    }
}

/// Write a flat CSV view of the record set (one row per record, empty
/// cell for absent values) for spreadsheet-type downstream tools.
pub fn write_csv(path: impl AsRef<Path>, set: &RecordSet) -> Result<()> {
    let path = path.as_ref();
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("open {}", path.display()))?;
    wtr.write_record(CSV_COLUMNS)?;

    for record in set.records() {
        let e = &record.extracted;
        let date_iso = match record.raw.get("date_iso") {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };
        wtr.write_record([
            record.id.clone(),
            date_iso,
            e.action.as_str().to_string(),
            opt_num(e.amount),
            opt_num(e.fee),
            opt_num(e.new_balance),
            opt_str(&e.sender_name),
            opt_str(&e.sender_phone),
            opt_str(&e.receiver_name),
            opt_str(&e.receiver_phone),
            opt_str(&e.txid),
            opt_str(&e.body_timestamp),
        ])?;
    }

    wtr.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

fn opt_num(v: Option<i64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn opt_str(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}
