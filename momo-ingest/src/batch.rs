//! Batch driver: XML dump in, normalized JSON record array out.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use momo_core::record::TransactionRecord;
use momo_core::store::save_records;

use crate::assemble::assemble;
use crate::body::BodyParser;
use crate::xml::read_sms_attributes;

/// Parse every `sms` node in `input` and write the full ordered record
/// array to `output`, returning the number of records written.
///
/// Fatal errors (unreadable input, malformed XML, unwritable output)
/// abort before any partial output exists. Per-message extraction
/// misses are absorbed into absent fields and never surface as batch
/// errors: one record per node, always.
pub fn run_batch(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<usize> {
    let input = input.as_ref();
    let xml = fs::read_to_string(input).with_context(|| format!("read {}", input.display()))?;
    let nodes =
        read_sms_attributes(&xml).with_context(|| format!("parse {}", input.display()))?;

    let parser = BodyParser::new()?;
    let records: Vec<TransactionRecord> = nodes
        .into_iter()
        .enumerate()
        .map(|(i, attrs)| assemble(&parser, attrs, i + 1))
        .collect();

    save_records(output, &records)?;
    Ok(records.len())
}
