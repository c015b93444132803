//! Query state: what the reviewer is filtering and sorting by.
//!
//! Part of the criteria is evaluated by the listing service (status, created
//! date range, timestamp ordering) and part locally (title search, title
//! ordering). [`QueryCriteria::server_query`] is the only place that decides
//! which is which.

use chrono::NaiveDate;
use conference_api::{RequestListQuery, SortBy, SortOrder};
use serde::Serialize;

use super::request::RequestStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    /// The status to send to the service; `None` for all.
    pub fn status(&self) -> Option<RequestStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(RequestStatus::Pending),
            StatusFilter::Approved => Some(RequestStatus::Approved),
            StatusFilter::Rejected => Some(RequestStatus::Rejected),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Approved => "Approved",
            StatusFilter::Rejected => "Rejected",
        }
    }

    pub fn variants() -> &'static [StatusFilter] {
        &[
            StatusFilter::All,
            StatusFilter::Pending,
            StatusFilter::Approved,
            StatusFilter::Rejected,
        ]
    }
}

impl From<RequestStatus> for StatusFilter {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => StatusFilter::Pending,
            RequestStatus::Approved => StatusFilter::Approved,
            RequestStatus::Rejected => StatusFilter::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortKey {
    /// Timestamp keys are ordered by the listing service.
    pub fn server_sort(&self) -> Option<SortBy> {
        match self {
            SortKey::CreatedAt => Some(SortBy::CreatedAt),
            SortKey::UpdatedAt => Some(SortBy::UpdatedAt),
            SortKey::Title => None,
        }
    }

    /// Direction a key starts in when first selected.
    pub fn initial_direction(&self) -> SortDirection {
        match self {
            SortKey::Title => SortDirection::Ascending,
            SortKey::CreatedAt | SortKey::UpdatedAt => SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn server_order(&self) -> SortOrder {
        match self {
            SortDirection::Ascending => SortOrder::Asc,
            SortDirection::Descending => SortOrder::Desc,
        }
    }
}

/// Calendar-day range on request creation. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryCriteria {
    pub status_filter: StatusFilter,
    /// Case-insensitive substring matched against titles.
    pub search_term: String,
    pub created_range: DateRange,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl Default for QueryCriteria {
    fn default() -> Self {
        Self {
            status_filter: StatusFilter::All,
            search_term: String::new(),
            created_range: DateRange::default(),
            sort_key: SortKey::CreatedAt,
            sort_direction: SortDirection::Descending,
        }
    }
}

impl QueryCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// The subset of the criteria the listing service evaluates.
    ///
    /// A title sort sends neither `sortBy` nor `sortOrder`; the service
    /// returns its default order and the local query engine reorders.
    pub fn server_query(&self) -> RequestListQuery {
        let sort_by = self.sort_key.server_sort();
        RequestListQuery {
            status: self.status_filter.status(),
            start_date: self.created_range.start,
            end_date: self.created_range.end,
            sort_by,
            sort_order: sort_by.map(|_| self.sort_direction.server_order()),
        }
    }

    /// Select a sort key the way the column toggles do: the active key flips
    /// direction, a new key starts in its initial direction.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = key;
            self.sort_direction = key.initial_direction();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_criteria_query() {
        let query = QueryCriteria::default().server_query();
        assert_eq!(query.status, None);
        assert_eq!(query.start_date, None);
        assert_eq!(query.sort_by, Some(SortBy::CreatedAt));
        assert_eq!(query.sort_order, Some(SortOrder::Desc));
    }

    #[test]
    fn test_title_sort_is_not_sent() {
        let criteria = QueryCriteria {
            sort_key: SortKey::Title,
            sort_direction: SortDirection::Ascending,
            ..Default::default()
        };
        let query = criteria.server_query();
        assert_eq!(query.sort_by, None);
        assert_eq!(query.sort_order, None);
    }

    #[test]
    fn test_search_term_never_reaches_the_server() {
        let plain = QueryCriteria::default();
        let searching = QueryCriteria {
            search_term: "alp".into(),
            ..Default::default()
        };
        assert_eq!(plain.server_query(), searching.server_query());
    }

    #[test]
    fn test_status_and_range_are_sent() {
        let criteria = QueryCriteria {
            status_filter: StatusFilter::Rejected,
            created_range: DateRange::new(NaiveDate::from_ymd_opt(2025, 1, 1), None),
            sort_key: SortKey::UpdatedAt,
            sort_direction: SortDirection::Ascending,
            ..Default::default()
        };
        let query = criteria.server_query();
        assert_eq!(query.status, Some(RequestStatus::Rejected));
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(query.end_date, None);
        assert_eq!(query.sort_by, Some(SortBy::UpdatedAt));
        assert_eq!(query.sort_order, Some(SortOrder::Asc));
    }

    #[test]
    fn test_toggle_sort() {
        let mut criteria = QueryCriteria::default();

        criteria.toggle_sort(SortKey::CreatedAt);
        assert_eq!(criteria.sort_direction, SortDirection::Ascending);

        criteria.toggle_sort(SortKey::Title);
        assert_eq!(criteria.sort_key, SortKey::Title);
        assert_eq!(criteria.sort_direction, SortDirection::Ascending);

        criteria.toggle_sort(SortKey::Title);
        assert_eq!(criteria.sort_direction, SortDirection::Descending);

        criteria.toggle_sort(SortKey::UpdatedAt);
        assert_eq!(criteria.sort_key, SortKey::UpdatedAt);
        assert_eq!(criteria.sort_direction, SortDirection::Descending);
    }
}
