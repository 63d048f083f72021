//! Field extractors for mobile-money SMS bodies.
//!
//! Carrier wording varies between message variants, so every field has
//! its own pattern and a failed match yields an absent value. The
//! extractors are independent: none assumes another ran first, and no
//! combination of misses aborts a record.

use anyhow::Result;
use regex::Regex;

use momo_core::record::{Action, ExtractedFields};

/// Compiled body patterns, built once per batch and reused across
/// messages.
pub struct BodyParser {
    amount_re: Regex,
    txid_re: Regex,
    new_balance_re: Regex,
    new_balance_loose_re: Regex,
    fee_re: Regex,
    sender_re: Regex,
    receiver_re: Regex,
    paren_phone_re: Regex,
    body_ts_re: Regex,
}

impl BodyParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            amount_re: Regex::new(r"(?i)([0-9]{1,3}(?:,[0-9]{3})*|[0-9]+)\s*RWF")?,
            txid_re: Regex::new(r"(?i)(?:TxId|Financial Transaction Id)[:\s]*([0-9]+)")?,
            new_balance_re: Regex::new(r"(?i)new balance\s*[:\s]*([0-9,]+)\s*RWF")?,
            new_balance_loose_re: Regex::new(r"(?i)new balance[:\s]*([0-9,]+)")?,
            fee_re: Regex::new(r"(?i)fee was[:\s]*([0-9,]+)")?,
            sender_re: Regex::new(r"(?i)from\s+([A-Za-z .]+?)(?:\s*\(|\s+on|\s+at|\s+has|\.)")?,
            receiver_re: Regex::new(r"(?i)to\s+([A-Za-z0-9 \-]+?)(?:\s+\d+|\s*\(|\s+has|\s+at|\.|,)")?,
            paren_phone_re: Regex::new(r"\((\+?\d{6,})\)")?,
            body_ts_re: Regex::new(r"(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})")?,
        })
    }

    /// Run every extractor over one message body.
    pub fn parse(&self, body: &str) -> ExtractedFields {
        let body = body.trim();
        let (sender_name, sender_phone) = self.sender(body);
        let (receiver_name, receiver_phone) = self.receiver(body);
        ExtractedFields {
            raw_body: body.to_string(),
            txid: self.txid(body),
            amount: self.amount(body),
            new_balance: self.new_balance(body),
            fee: self.fee(body),
            sender_name,
            sender_phone,
            receiver_name,
            receiver_phone,
            action: Action::classify(body),
            body_timestamp: self.body_timestamp(body),
        }
    }

    /// Numeric token (optionally comma-grouped) immediately before the
    /// RWF marker.
    pub fn amount(&self, body: &str) -> Option<i64> {
        self.amount_re
            .captures(body)
            .and_then(|c| parse_grouped(&c[1]))
    }

    /// Digit run after a `TxId` / `Financial Transaction Id` label,
    /// kept as text: the value is an opaque identifier.
    pub fn txid(&self, body: &str) -> Option<String> {
        self.txid_re.captures(body).map(|c| c[1].to_string())
    }

    /// The primary pattern requires the currency marker; some message
    /// variants omit it, so a looser label-and-digits fallback runs
    /// second.
    pub fn new_balance(&self, body: &str) -> Option<i64> {
        self.new_balance_re
            .captures(body)
            .or_else(|| self.new_balance_loose_re.captures(body))
            .and_then(|c| parse_grouped(&c[1]))
    }

    pub fn fee(&self, body: &str) -> Option<i64> {
        self.fee_re.captures(body).and_then(|c| parse_grouped(&c[1]))
    }

    /// Sender name and phone.
    ///
    /// The phone comes from the shared parenthesized-number pattern and
    /// is reported even when the name never matches: phone extraction is
    /// orthogonal to name extraction.
    pub fn sender(&self, body: &str) -> (Option<String>, Option<String>) {
        let name = self
            .sender_re
            .captures(body)
            .map(|c| c[1].trim().to_string());
        (name, self.paren_phone(body))
    }

    /// Receiver name and phone; both absent when the "to" pattern never
    /// matches.
    ///
    /// The phone shares the sender's parenthesized-number source, so a
    /// body with exactly one such number attributes it to both parties.
    pub fn receiver(&self, body: &str) -> (Option<String>, Option<String>) {
        match self.receiver_re.captures(body) {
            Some(c) => (Some(c[1].trim().to_string()), self.paren_phone(body)),
            None => (None, None),
        }
    }

    /// First "YYYY-MM-DD HH:MM:SS" substring, verbatim.
    pub fn body_timestamp(&self, body: &str) -> Option<String> {
        self.body_ts_re.captures(body).map(|c| c[1].to_string())
    }

    /// Any parenthesized run of 6+ digits, optionally `+`-prefixed.
    fn paren_phone(&self, body: &str) -> Option<String> {
        self.paren_phone_re.captures(body).map(|c| c[1].to_string())
    }
}

/// Strip grouping commas and parse; `None` on overflow.
fn parse_grouped(digits: &str) -> Option<i64> {
    digits.replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> BodyParser {
        BodyParser::new().unwrap()
    }

    const RECEIVED: &str = "You have received 2000 RWF from Jane Smith (+250788110381) on your \
         mobile money account at 2024-05-10 16:30:51. Message from sender: . Your new balance: \
         2000 RWF. Financial Transaction Id: 76662021700.";

    const PAYMENT: &str = "TxId: 73214484437. Your payment of 1,000 RWF to Jane Smith 12845 has \
         been completed at 2024-05-10 16:31:39. Your new balance: 1,000 RWF. Fee was 0 RWF.";

    const TRANSFER: &str = "*165*S*10000 RWF transferred to Samuel Carter (250791666666) from \
         36521838 at 2024-05-11 20:34:47. Fee was: 100 RWF. New balance: 28300 RWF.";

    const DEPOSIT: &str = "*113*R*A bank deposit of 40000 RWF has been added to your mobile \
         money account at 2024-05-11 18:43:49. Your NEW BALANCE :40400 RWF.";

    #[test]
    fn test_amount_with_and_without_grouping() {
        let p = parser();
        assert_eq!(p.amount("Your payment of 1,000 RWF"), Some(1000));
        assert_eq!(p.amount("Your payment of 1000 RWF"), Some(1000));
        assert_eq!(p.amount("received 600 rwf today"), Some(600));
        assert_eq!(p.amount("no currency amount here"), None);
    }

    #[test]
    fn test_txid_both_label_forms() {
        let p = parser();
        assert_eq!(p.txid(PAYMENT).as_deref(), Some("73214484437"));
        assert_eq!(p.txid(RECEIVED).as_deref(), Some("76662021700"));
        assert_eq!(p.txid("no label"), None);
    }

    #[test]
    fn test_new_balance_fallback_without_marker() {
        let p = parser();
        assert_eq!(p.new_balance(TRANSFER), Some(28300));
        assert_eq!(p.new_balance(DEPOSIT), Some(40400));
        // Marker omitted entirely: the loose pattern still recovers it.
        assert_eq!(p.new_balance("done. new balance: 5,000"), Some(5000));
        assert_eq!(p.new_balance("balance unknown"), None);
    }

    #[test]
    fn test_fee() {
        let p = parser();
        assert_eq!(p.fee(PAYMENT), Some(0));
        assert_eq!(p.fee(TRANSFER), Some(100));
        assert_eq!(p.fee("Fee was 2,500 RWF"), Some(2500));
        assert_eq!(p.fee("free of charge"), None);
    }

    #[test]
    fn test_sender_name_and_phone() {
        let p = parser();
        let (name, phone) = p.sender(RECEIVED);
        assert_eq!(name.as_deref(), Some("Jane Smith"));
        assert_eq!(phone.as_deref(), Some("+250788110381"));
    }

    #[test]
    fn test_phone_reported_without_sender_name() {
        // "from" is followed by digits here, so the name pattern never
        // matches, but the parenthesized phone is still found.
        let p = parser();
        let (name, phone) = p.sender(TRANSFER);
        assert_eq!(name, None);
        assert_eq!(phone.as_deref(), Some("250791666666"));
    }

    #[test]
    fn test_receiver_terminated_by_digit_run() {
        let p = parser();
        let (name, phone) = p.receiver(PAYMENT);
        assert_eq!(name.as_deref(), Some("Jane Smith"));
        assert_eq!(phone, None);
    }

    #[test]
    fn test_receiver_absent_without_to() {
        let p = parser();
        assert_eq!(p.receiver("A bank deposit of 100 RWF"), (None, None));
    }

    #[test]
    fn test_single_phone_attributed_to_both_parties() {
        // One parenthesized number, both name patterns match: the shared
        // source assigns it to sender and receiver alike. Documented
        // ambiguity of the heuristic, kept as-is.
        let p = parser();
        let body = "Transfer from Agent Bob (+250788000001) to Carol Doe has completed";
        let (sender_name, sender_phone) = p.sender(body);
        let (receiver_name, receiver_phone) = p.receiver(body);
        assert_eq!(sender_name.as_deref(), Some("Agent Bob"));
        assert_eq!(receiver_name.as_deref(), Some("Carol Doe"));
        assert_eq!(sender_phone, receiver_phone);
        assert_eq!(sender_phone.as_deref(), Some("+250788000001"));
    }

    #[test]
    fn test_body_timestamp_first_match() {
        let p = parser();
        assert_eq!(
            p.body_timestamp(RECEIVED).as_deref(),
            Some("2024-05-10 16:30:51")
        );
        assert_eq!(p.body_timestamp("no timestamp"), None);
    }

    #[test]
    fn test_parse_received_message() {
        let fields = parser().parse(RECEIVED);
        assert_eq!(fields.action, Action::Received);
        assert_eq!(fields.amount, Some(2000));
        assert_eq!(fields.new_balance, Some(2000));
        assert_eq!(fields.txid.as_deref(), Some("76662021700"));
        assert_eq!(fields.sender_name.as_deref(), Some("Jane Smith"));
        assert_eq!(fields.raw_body, RECEIVED);
    }

    #[test]
    fn test_parse_transfer_message() {
        let fields = parser().parse(TRANSFER);
        assert_eq!(fields.action, Action::Transfer);
        assert_eq!(fields.amount, Some(10000));
        assert_eq!(fields.fee, Some(100));
        assert_eq!(fields.receiver_name.as_deref(), Some("Samuel Carter"));
        assert_eq!(fields.receiver_phone.as_deref(), Some("250791666666"));
        assert_eq!(fields.body_timestamp.as_deref(), Some("2024-05-11 20:34:47"));
    }

    #[test]
    fn test_parse_empty_body() {
        let fields = parser().parse("");
        assert_eq!(fields, ExtractedFields::default());
    }
}
