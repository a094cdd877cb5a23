use chrono::{DateTime, Utc};

// ============== Timestamp Helpers ==============

/// Human UTC timestamp for console log lines (`2026-10-19 08:30:00 UTC`).
pub fn utc_timestamp() -> String {
    format_utc(Utc::now())
}

pub fn format_utc(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn utc_format_is_stable() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_utc(at), "2026-01-02 03:04:05 UTC");
    }
}
