//! Full conference records from the detail source.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use conference_api::Location;

/// The full record a request refers to, as the detail source returned it.
///
/// Revision dates are still raw strings here; they become real timestamps
/// when the aggregator merges the record into a [`ViewRecord`](super::ViewRecord).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDetails {
    pub record_id: String,
    pub title: Option<String>,
    /// Acronym.
    pub short_code: Option<String>,
    pub owner_id: Option<String>,
    pub revisions: Vec<RawRevision>,
}

impl RecordDetails {
    pub fn new(record_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_short_code(mut self, short_code: impl Into<String>) -> Self {
        self.short_code = Some(short_code.into());
        self
    }

    pub fn with_revision(mut self, revision: RawRevision) -> Self {
        self.revisions.push(revision);
        self
    }
}

/// A revision with its labelled dates still string-encoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRevision {
    pub year: Option<i32>,
    pub access_type: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub locations: Vec<Location>,
    pub topics: Vec<String>,
    pub dates: Vec<RawDateEntry>,
}

impl RawRevision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, entry: RawDateEntry) -> Self {
        self.dates.push(entry);
        self
    }
}

/// One labelled date range as the detail source sent it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDateEntry {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    /// Machine label such as `submissionDeadline`.
    pub kind: Option<String>,
    /// Human label such as "Conference".
    pub name: Option<String>,
}

impl RawDateEntry {
    pub fn new(from_date: Option<&str>, to_date: Option<&str>) -> Self {
        Self {
            from_date: from_date.map(str::to_string),
            to_date: to_date.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// An entry in a record's history, with parsed dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Revision {
    pub year: Option<i32>,
    pub access_type: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub locations: Vec<Location>,
    pub topics: Vec<String>,
    /// Important dates, in the order the source listed them.
    pub dates: Vec<DateEntry>,
}

impl Revision {
    /// Revisions none of whose dates could be read stay in the record but
    /// take no part in date display.
    pub fn is_dated(&self) -> bool {
        self.dates.iter().any(DateEntry::is_dated)
    }

    pub fn dated_entries(&self) -> impl Iterator<Item = &DateEntry> {
        self.dates.iter().filter(|entry| entry.is_dated())
    }
}

const FALLBACK_DATE_LABEL: &str = "Date Range";

/// A labelled date range, e.g. "Submission deadline".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateEntry {
    pub window: DateWindow,
    pub kind: Option<String>,
    pub name: Option<String>,
}

impl DateEntry {
    pub fn is_dated(&self) -> bool {
        self.window.is_dated()
    }

    /// The name, else the kind, else a generic label. Blank labels count as
    /// missing.
    pub fn label(&self) -> &str {
        [self.name.as_deref(), self.kind.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|label| !label.is_empty())
            .unwrap_or(FALLBACK_DATE_LABEL)
    }
}

/// Validity window of a revision. Either end may be open.
///
/// Invariant: `from <= to` when both are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// Build a window, swapping the ends if they arrive inverted.
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        match (from, to) {
            (Some(a), Some(b)) if a > b => Self {
                from: Some(b),
                to: Some(a),
            },
            _ => Self { from, to },
        }
    }

    pub fn is_dated(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Whether `at` falls inside the window; open ends are unbounded.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.is_dated()
            && self.from.map_or(true, |from| from <= at)
            && self.to.map_or(true, |to| at <= to)
    }
}
