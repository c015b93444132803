//! Revision date normalization.
//!
//! The detail service encodes revision dates as strings in a few shapes:
//! RFC 3339 timestamps, naive date-times, and bare calendar days. Everything
//! is read as UTC; bare days become midnight.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::types::{DateEntry, DateWindow, RawDateEntry, RawRevision, Revision};

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse one raw date string; `None` when it is blank or unreadable.
pub fn parse_point_in_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
    })
}

/// Turn a raw revision into one with real timestamps. Unreadable ends become
/// open; nothing is dropped.
pub fn normalize_revision(raw: RawRevision) -> Revision {
    Revision {
        year: raw.year,
        access_type: raw.access_type,
        link: raw.link,
        summary: raw.summary,
        locations: raw.locations,
        topics: raw.topics,
        dates: raw.dates.into_iter().map(normalize_date_entry).collect(),
    }
}

/// Parse one labelled date range. An entry whose ends are both unreadable
/// is kept with an undated window.
pub fn normalize_date_entry(raw: RawDateEntry) -> DateEntry {
    let from = raw.from_date.as_deref().and_then(parse_point_in_time);
    let to = raw.to_date.as_deref().and_then(parse_point_in_time);

    if from.is_none() && to.is_none() && (raw.from_date.is_some() || raw.to_date.is_some()) {
        tracing::debug!(
            kind = ?raw.kind,
            from_date = ?raw.from_date,
            to_date = ?raw.to_date,
            "Date entry unreadable, keeping it undated"
        );
    }

    DateEntry {
        window: DateWindow::new(from, to),
        kind: raw.kind,
        name: raw.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parses_rfc3339() {
        let parsed = parse_point_in_time("2025-05-21T08:30:00.000Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 5, 21, 8, 30, 0).unwrap());

        let offset = parse_point_in_time("2025-05-21T08:30:00+07:00").unwrap();
        assert_eq!(offset, Utc.with_ymd_and_hms(2025, 5, 21, 1, 30, 0).unwrap());
    }

    #[test]
    fn test_parses_naive_forms() {
        assert_eq!(
            parse_point_in_time("2025-05-21T08:30:00"),
            Some(Utc.with_ymd_and_hms(2025, 5, 21, 8, 30, 0).unwrap())
        );
        assert_eq!(
            parse_point_in_time(" 2025-05-21 "),
            Some(Utc.with_ymd_and_hms(2025, 5, 21, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_point_in_time("2025/05/21"),
            Some(Utc.with_ymd_and_hms(2025, 5, 21, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_point_in_time(""), None);
        assert_eq!(parse_point_in_time("TBD"), None);
        assert_eq!(parse_point_in_time("2025-13-45"), None);
    }

    #[test]
    fn test_unreadable_revision_is_kept_undated() {
        let mut raw = RawRevision::new()
            .with_date(RawDateEntry::new(Some("soon"), Some("later")).with_name("Conference"));
        raw.topics = vec!["AI".into()];

        let revision = normalize_revision(raw);
        assert!(!revision.is_dated());
        assert_eq!(revision.dates.len(), 1);
        assert_eq!(revision.dates[0].label(), "Conference");
        assert_eq!(revision.topics, vec!["AI".to_string()]);
    }

    #[test]
    fn test_half_readable_entry_is_open_ended() {
        let entry = normalize_date_entry(RawDateEntry::new(Some("2025-05-21"), Some("??")));
        assert!(entry.is_dated());
        assert!(entry.window.from.is_some());
        assert!(entry.window.to.is_none());
    }

    #[test]
    fn test_each_entry_is_normalized_on_its_own() {
        let raw = RawRevision::new()
            .with_date(
                RawDateEntry::new(
                    Some("2025-05-31T00:00:00.000Z"),
                    Some("2025-05-21T00:00:00.000Z"),
                )
                .with_kind("conferenceDates")
                .with_name("Conference"),
            )
            .with_date(RawDateEntry::new(Some("TBD"), None).with_kind("notification"))
            .with_date(RawDateEntry::new(Some("2025/03/01"), None).with_kind("submissionDeadline"));

        let revision = normalize_revision(raw);
        assert!(revision.is_dated());
        assert_eq!(revision.dates.len(), 3);

        let conference = &revision.dates[0];
        assert_eq!(
            conference.window.from,
            Some(Utc.with_ymd_and_hms(2025, 5, 21, 0, 0, 0).unwrap())
        );
        assert_eq!(
            conference.window.to,
            Some(Utc.with_ymd_and_hms(2025, 5, 31, 0, 0, 0).unwrap())
        );

        assert!(!revision.dates[1].is_dated());
        assert_eq!(revision.dates[1].label(), "notification");

        assert!(revision.dates[2].is_dated());
        assert_eq!(revision.dated_entries().count(), 2);
    }
}
