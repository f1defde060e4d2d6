//! Money rounding and timestamp formatting for API responses.

use mongodb::bson::DateTime;

/// Rounds an amount to two decimals (half away from zero).
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// RFC 3339 rendering of a bson timestamp; empty if it is out of range.
pub fn to_rfc3339(value: DateTime) -> String {
    value.try_to_rfc3339_string().unwrap_or_default()
}

pub fn to_rfc3339_opt(value: Option<DateTime>) -> Option<String> {
    value.map(to_rfc3339)
}

/// Converts a chrono timestamp received in a request into a bson one.
pub fn from_chrono(value: chrono::DateTime<chrono::Utc>) -> DateTime {
    DateTime::from_millis(value.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(10.126), 10.13);
        assert_eq!(round_money(19.994), 19.99);
        assert_eq!(round_money(0.0), 0.0);
    }

    #[test]
    fn test_chrono_roundtrip_keeps_millis() {
        let instant = chrono::Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
        let bson = from_chrono(instant);
        assert_eq!(bson.timestamp_millis(), instant.timestamp_millis());
        assert!(to_rfc3339(bson).starts_with("2025-01-31T23:59:59"));
    }
}
