//! Epoch-millisecond timestamp conversion.

use chrono::{SecondsFormat, TimeZone, Utc};

/// Convert an epoch-millisecond attribute value ("1715351451000") to a
/// UTC ISO-8601 string with a trailing `Z`.
///
/// Returns `None` when the value is not an integer or falls outside the
/// representable range; the caller keeps the raw attribute as-is.
pub fn epoch_ms_to_iso(raw: &str) -> Option<String> {
    let ms: i64 = raw.trim().parse().ok()?;
    let dt = Utc.timestamp_millis_opt(ms).single()?;
    Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_second_epoch() {
        assert_eq!(
            epoch_ms_to_iso("1700000000000").as_deref(),
            Some("2023-11-14T22:13:20Z")
        );
    }

    #[test]
    fn test_millisecond_precision_is_kept() {
        assert_eq!(
            epoch_ms_to_iso("1700000000123").as_deref(),
            Some("2023-11-14T22:13:20.123Z")
        );
    }

    #[test]
    fn test_invalid_input_yields_none() {
        assert_eq!(epoch_ms_to_iso("not-a-number"), None);
        assert_eq!(epoch_ms_to_iso(""), None);
        // Parses as i64 but is far outside chrono's range.
        assert_eq!(epoch_ms_to_iso("9223372036854775807"), None);
    }
}
