//! Property tests for aggregation and the local query engine.

use std::time::Duration;

use moderation::testing::{sample_details, sample_request, MockModerationApi};
use moderation::{
    aggregate, apply_query, merge, QueryCriteria, SortDirection, SortKey, SourceError, ViewRecord,
};
use proptest::prelude::*;

/// How one generated request's lookup behaves.
#[derive(Debug, Clone, Copy)]
enum Lookup {
    Found,
    Fails,
    NoReference,
}

fn arb_lookup() -> impl Strategy<Value = Lookup> {
    prop_oneof![Just(Lookup::Found), Just(Lookup::Fails), Just(Lookup::NoReference)]
}

fn run_aggregation(plan: &[Lookup]) -> Vec<ViewRecord> {
    let mut api = MockModerationApi::new();
    let mut requests = Vec::with_capacity(plan.len());

    for (i, lookup) in plan.iter().enumerate() {
        let record_id = format!("rec{i}");
        match lookup {
            Lookup::Found => {
                api = api.with_details(sample_details(&record_id, &format!("Title {i}")));
                requests.push(sample_request(&format!("req{i}"), Some(&record_id)));
            }
            Lookup::Fails => {
                api = api.with_detail_failure(&record_id, SourceError::Network("reset".into()));
                requests.push(sample_request(&format!("req{i}"), Some(&record_id)));
            }
            Lookup::NoReference => {
                requests.push(sample_request(&format!("req{i}"), None));
            }
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("build test runtime");
    runtime.block_on(aggregate(&api, requests, Duration::from_secs(1)))
}

fn titled(titles: &[String]) -> Vec<ViewRecord> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let record_id = format!("rec{i}");
            merge(
                sample_request(&format!("req{i}"), Some(&record_id)),
                Ok(sample_details(&record_id, title)),
            )
        })
        .collect()
}

fn title_sort(direction: SortDirection) -> QueryCriteria {
    QueryCriteria {
        sort_key: SortKey::Title,
        sort_direction: direction,
        ..Default::default()
    }
}

fn ids(records: &[ViewRecord]) -> Vec<String> {
    records.iter().map(|r| r.request_id.clone()).collect()
}

proptest! {
    /// One view record per request, in request order, whatever fails.
    #[test]
    fn merge_is_complete_and_ordered(plan in prop::collection::vec(arb_lookup(), 0..16)) {
        let records = run_aggregation(&plan);

        prop_assert_eq!(records.len(), plan.len());
        for (i, (record, lookup)) in records.iter().zip(&plan).enumerate() {
            prop_assert_eq!(&record.request_id, &format!("req{i}"));
            match lookup {
                Lookup::Found => {
                    prop_assert!(record.details_error.is_none());
                    prop_assert_eq!(&record.title, &format!("Title {i}"));
                }
                Lookup::Fails | Lookup::NoReference => {
                    prop_assert!(record.details_error.is_some());
                }
            }
        }
    }

    /// With distinct titles, flipping direction exactly reverses the order.
    #[test]
    fn title_sort_reverses(titles in prop::collection::btree_set("[a-z]{1,8}", 0..12)) {
        let titles: Vec<String> = titles.into_iter().rev().collect();
        let records = titled(&titles);

        let ascending = ids(&apply_query(&records, &title_sort(SortDirection::Ascending)));
        let mut descending = ids(&apply_query(&records, &title_sort(SortDirection::Descending)));
        descending.reverse();

        prop_assert_eq!(ascending, descending);
    }

    /// Equal titles keep their incoming relative order in both directions.
    #[test]
    fn title_sort_is_stable(titles in prop::collection::vec("[ab]", 0..12)) {
        let records = titled(&titles);

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let sorted = apply_query(&records, &title_sort(direction));
            for title in ["a", "b"] {
                let order: Vec<String> = sorted
                    .iter()
                    .filter(|r| r.title == title)
                    .map(|r| r.request_id.clone())
                    .collect();
                let original: Vec<String> = records
                    .iter()
                    .filter(|r| r.title == title)
                    .map(|r| r.request_id.clone())
                    .collect();
                prop_assert_eq!(order, original);
            }
        }
    }

    /// Searching twice for the same term narrows no further.
    #[test]
    fn search_is_idempotent(
        titles in prop::collection::vec("[a-cA-C]{1,5}", 0..12),
        term in "[a-c]{1,2}",
    ) {
        let records = titled(&titles);
        let criteria = QueryCriteria { search_term: term, ..Default::default() };

        let once = apply_query(&records, &criteria);
        let twice = apply_query(&once, &criteria);
        prop_assert_eq!(once, twice);
    }
}
