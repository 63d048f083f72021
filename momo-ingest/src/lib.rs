//! momo-ingest: XML message reader, body field extractors, and the batch
//! driver that turns a phone-exported SMS dump into normalized
//! transaction records.

pub mod assemble;
pub mod batch;
pub mod body;
pub mod xml;

pub use assemble::assemble;
pub use batch::run_batch;
pub use body::BodyParser;
pub use xml::read_sms_attributes;
