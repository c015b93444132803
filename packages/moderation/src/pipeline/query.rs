//! Local half of the query: title search and title ordering.

use std::cmp::Reverse;

use crate::types::{QueryCriteria, SortDirection, SortKey, ViewRecord};

/// Derive the displayed list from the aggregated one.
///
/// Timestamp sort keys keep the listing service's order untouched; only a
/// title sort reorders, and ties keep their incoming order.
pub fn apply_query(records: &[ViewRecord], criteria: &QueryCriteria) -> Vec<ViewRecord> {
    let needle = criteria.search_term.trim().to_lowercase();

    let mut displayed: Vec<ViewRecord> = records
        .iter()
        .filter(|record| needle.is_empty() || record.title.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    if criteria.sort_key == SortKey::Title {
        // Reverse the key, not the output, so ties stay in server order.
        match criteria.sort_direction {
            SortDirection::Ascending => displayed.sort_by_cached_key(|r| r.title.to_lowercase()),
            SortDirection::Descending => {
                displayed.sort_by_cached_key(|r| Reverse(r.title.to_lowercase()))
            }
        }
    }

    displayed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::merge;
    use crate::testing::sample_request;
    use crate::types::RecordDetails;

    fn record(request_id: &str, title: &str) -> ViewRecord {
        merge(
            sample_request(request_id, Some("rec")),
            Ok(RecordDetails::new("rec").with_title(title)),
        )
    }

    fn titles(records: &[ViewRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    fn ids(records: &[ViewRecord]) -> Vec<&str> {
        records.iter().map(|r| r.request_id.as_str()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = vec![record("r1", "Alpha"), record("r2", "Beta"), record("r3", "ALPINE")];
        let criteria = QueryCriteria {
            search_term: "alp".into(),
            ..Default::default()
        };

        assert_eq!(titles(&apply_query(&records, &criteria)), vec!["Alpha", "ALPINE"]);
    }

    #[test]
    fn test_blank_search_disables_filter() {
        let records = vec![record("r1", "Alpha"), record("r2", "Beta")];
        let criteria = QueryCriteria {
            search_term: "   ".into(),
            ..Default::default()
        };

        assert_eq!(apply_query(&records, &criteria).len(), 2);
    }

    #[test]
    fn test_search_term_is_trimmed() {
        let records = vec![record("r1", "Alpha"), record("r2", "Beta")];
        let criteria = QueryCriteria {
            search_term: "  bet ".into(),
            ..Default::default()
        };

        assert_eq!(titles(&apply_query(&records, &criteria)), vec!["Beta"]);
    }

    #[test]
    fn test_timestamp_sort_keeps_server_order() {
        let records = vec![record("r1", "Gamma"), record("r2", "Alpha"), record("r3", "Beta")];

        for key in [SortKey::CreatedAt, SortKey::UpdatedAt] {
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                let criteria = QueryCriteria {
                    sort_key: key,
                    sort_direction: direction,
                    ..Default::default()
                };
                assert_eq!(ids(&apply_query(&records, &criteria)), vec!["r1", "r2", "r3"]);
            }
        }
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let records = vec![record("r1", "beta"), record("r2", "Alpha"), record("r3", "Charlie")];
        let criteria = QueryCriteria {
            sort_key: SortKey::Title,
            sort_direction: SortDirection::Ascending,
            ..Default::default()
        };

        assert_eq!(titles(&apply_query(&records, &criteria)), vec!["Alpha", "beta", "Charlie"]);

        let descending = QueryCriteria {
            sort_direction: SortDirection::Descending,
            ..criteria
        };
        assert_eq!(titles(&apply_query(&records, &descending)), vec!["Charlie", "beta", "Alpha"]);
    }

    #[test]
    fn test_title_sort_ties_keep_server_order_both_ways() {
        let records = vec![
            record("r1", "Same"),
            record("r2", "Other"),
            record("r3", "same"),
        ];

        let ascending = QueryCriteria {
            sort_key: SortKey::Title,
            sort_direction: SortDirection::Ascending,
            ..Default::default()
        };
        assert_eq!(ids(&apply_query(&records, &ascending)), vec!["r2", "r1", "r3"]);

        let descending = QueryCriteria {
            sort_direction: SortDirection::Descending,
            ..ascending
        };
        assert_eq!(ids(&apply_query(&records, &descending)), vec!["r1", "r3", "r2"]);
    }

    #[test]
    fn test_search_is_idempotent() {
        let records = vec![record("r1", "Alpha"), record("r2", "Beta"), record("r3", "Alpaca")];
        let criteria = QueryCriteria {
            search_term: "alp".into(),
            ..Default::default()
        };

        let once = apply_query(&records, &criteria);
        let twice = apply_query(&once, &criteria);
        assert_eq!(once, twice);
    }
}
