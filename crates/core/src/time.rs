//! Date, duration and SLA helpers
//!
//! The Table API exchanges timestamps as `YYYY-MM-DD HH:MM:SS` in UTC
//! (unless the integration user has a different time zone configured).

use chrono::{DateTime, NaiveDateTime, Utc};
use snowgate_domain::Sla;

/// Wire format for date-time fields
pub const SERVICENOW_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_servicenow_date(date: DateTime<Utc>) -> String {
    date.format(SERVICENOW_DATE_FORMAT).to_string()
}

/// Parse a wire timestamp, also accepting RFC 3339.
pub fn parse_servicenow_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(value, SERVICENOW_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.with_timezone(&Utc)))
}

/// Whether an SLA has breached as of `now`.
///
/// The platform's `has_breached` flag wins. Without it, the SLA counts as
/// breached once `now` is past `planned_end_time` (or `end_time`).
pub fn is_sla_breached(sla: &Sla, now: DateTime<Utc>) -> bool {
    if let Some(breached) = sla.has_breached {
        return breached;
    }
    sla.planned_end_time
        .as_deref()
        .or(sla.end_time.as_deref())
        .and_then(parse_servicenow_date)
        .is_some_and(|end| now > end)
}

/// Render seconds as `1h 2m 3s`, omitting zero units.
///
/// Zero renders as `0s`.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn formats_without_t_or_fraction() {
        let date = Utc.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_servicenow_date(date), "2026-03-09 07:05:01");
    }

    #[test]
    fn parses_both_wire_and_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(parse_servicenow_date("2026-03-09 07:05:01"), Some(expected));
        assert_eq!(parse_servicenow_date("2026-03-09T09:05:01+02:00"), Some(expected));
        assert_eq!(parse_servicenow_date(""), None);
        assert_eq!(parse_servicenow_date("yesterday"), None);
    }

    #[test]
    fn duration_omits_zero_units() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(3723), "1h 2m 3s");
        assert_eq!(format_duration(3600), "1h");
        assert_eq!(format_duration(3603), "1h 3s");
    }

    #[test]
    fn breach_prefers_flag_then_end_time() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 12, 0, 0).unwrap();

        let flagged = Sla { has_breached: Some(false), planned_end_time: Some("2026-01-01 00:00:00".into()), ..Sla::default() };
        assert!(!is_sla_breached(&flagged, now));

        let overdue = Sla { planned_end_time: Some("2026-01-02 11:59:59".into()), ..Sla::default() };
        assert!(is_sla_breached(&overdue, now));

        let pending = Sla { end_time: Some("2026-01-02 12:00:01".into()), ..Sla::default() };
        assert!(!is_sla_breached(&pending, now));

        assert!(!is_sla_breached(&Sla::default(), now));
    }
}
