//! Text helpers for rendering records in a console.

use chrono::{DateTime, Utc};

use crate::types::{
    DateEntry, DateWindow, Location, RequestStatus, SortDirection, SortKey, StatusCounts,
    StatusFilter,
};

const DAY_FORMAT: &str = "%B %-d, %Y";
const TIMESTAMP_FORMAT: &str = "%b %-d, %Y %H:%M UTC";
const NOT_AVAILABLE: &str = "N/A";

pub fn format_day(at: DateTime<Utc>) -> String {
    at.format(DAY_FORMAT).to_string()
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Human-readable validity window.
///
/// Both ends on the same calendar day collapse to that day.
pub fn format_date_window(window: &DateWindow) -> String {
    match (window.from, window.to) {
        (None, None) => NOT_AVAILABLE.to_string(),
        (Some(from), Some(to)) if from.date_naive() == to.date_naive() => format_day(from),
        (Some(from), Some(to)) => format!("{} - {}", format_day(from), format_day(to)),
        (Some(from), None) => format!("{} onwards", format_day(from)),
        (None, Some(to)) => format!("until {}", format_day(to)),
    }
}

/// One line of the "Important Dates" list, e.g.
/// `Conference: May 21, 2025 - May 31, 2025`.
pub fn format_date_entry(entry: &DateEntry) -> String {
    format!("{}: {}", entry.label(), format_date_window(&entry.window))
}

/// Address, city and country joined with commas. The continent is only used
/// when nothing more specific is known.
pub fn format_location(location: &Location) -> String {
    let parts: Vec<&str> = [
        location.address.as_deref(),
        location.city_state_province.as_deref(),
        location.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect();

    if !parts.is_empty() {
        return parts.join(", ");
    }

    location
        .continent
        .as_deref()
        .map(str::trim)
        .filter(|continent| !continent.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

pub fn sort_label(key: SortKey, direction: SortDirection) -> &'static str {
    match (key, direction) {
        (SortKey::Title, SortDirection::Ascending) => "A-Z",
        (SortKey::Title, SortDirection::Descending) => "Z-A",
        (_, SortDirection::Ascending) => "Oldest First",
        (_, SortDirection::Descending) => "Newest First",
    }
}

pub fn sort_key_label(key: SortKey) -> &'static str {
    match key {
        SortKey::CreatedAt => "Created",
        SortKey::UpdatedAt => "Updated",
        SortKey::Title => "Title",
    }
}

pub fn status_label(status: RequestStatus) -> &'static str {
    StatusFilter::from(status).label()
}

/// Status filter option with its count, e.g. `Pending (3)`.
pub fn status_option_label(filter: StatusFilter, counts: &StatusCounts) -> String {
    format!("{} ({})", filter.label(), counts.get(filter))
}
