use alloc::string::String;

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats an instant as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub(crate) fn iso_millis(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_millis() {
        let instant = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(iso_millis(instant), "2023-11-14T22:13:20.123Z");
        let epoch = DateTime::from_timestamp_millis(0).unwrap();
        assert_eq!(iso_millis(epoch), "1970-01-01T00:00:00.000Z");
    }
}
