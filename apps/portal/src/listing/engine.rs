//! Listing state machine: an explicit state plus a pure reducer, and the
//! `Listing` that applies it to a backing collection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::listing::filter::{apply_filters, matches, normalize_search, FilterState};
use crate::listing::page::{page_range, paginate, total_pages};
use crate::listing::sort::{sort_by_mode, sort_records, SortMode};
use crate::models::job::JobRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingState {
    pub filters: FilterState,
    pub sort: SortMode,
    /// 1-based.
    pub page: usize,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            sort: SortMode::default(),
            page: 1,
        }
    }
}

/// User input and data events that drive a listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ListingEvent {
    SetSearch(String),
    SetLocation(String),
    SetExperience(String),
    SetSalary(String),
    SetSort(SortMode),
    GoToPage(usize),
    ClearFilters,
    /// A fresh backing collection replaced the old one.
    #[serde(skip)]
    RecordsLoaded(Arc<[JobRecord]>),
}

/// How much of the pipeline an event invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recompute {
    /// Filter and sort again, then slice.
    Full,
    /// The ordered matches are still valid; only the page changed.
    Slice,
}

/// Pure transition. Every filter or sort change, and a new record set, puts
/// the user back on page 1.
pub fn reduce(state: &ListingState, event: &ListingEvent) -> (ListingState, Recompute) {
    let mut next = state.clone();
    let recompute = match event {
        ListingEvent::GoToPage(page) => {
            next.page = *page;
            return (next, Recompute::Slice);
        }
        ListingEvent::SetSearch(text) => {
            next.filters.search = text.clone();
            Recompute::Full
        }
        ListingEvent::SetLocation(value) => {
            next.filters.location = value.clone();
            Recompute::Full
        }
        ListingEvent::SetExperience(value) => {
            next.filters.experience = value.clone();
            Recompute::Full
        }
        ListingEvent::SetSalary(value) => {
            next.filters.salary = value.clone();
            Recompute::Full
        }
        ListingEvent::SetSort(mode) => {
            next.sort = *mode;
            Recompute::Full
        }
        ListingEvent::ClearFilters => {
            next.filters = FilterState::default();
            next.sort = SortMode::default();
            Recompute::Full
        }
        ListingEvent::RecordsLoaded(_) => Recompute::Full,
    };
    next.page = 1;
    (next, recompute)
}

/// What a renderer needs for one visible page.
#[derive(Debug, Clone, Serialize)]
pub struct ListingSnapshot {
    pub items: Vec<JobRecord>,
    /// Records passing the filters, not the size of the backing collection.
    pub matched_total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub state: ListingState,
}

impl ListingSnapshot {
    /// One-shot filter, sort and paginate over `records` with no cached
    /// ordering. Yields the same page as a [`Listing`] in the same state.
    pub fn compute(records: &[JobRecord], state: ListingState, page_size: usize) -> Self {
        let mut matched = apply_filters(records, &state.filters);
        sort_records(&mut matched, state.sort);
        let page = paginate(&matched, state.page, page_size);

        Self {
            items: page.items.into_iter().cloned().collect(),
            matched_total: page.total,
            page: state.page,
            page_size,
            total_pages: total_pages(page.total, page_size),
            state,
        }
    }

    pub fn no_results(&self) -> bool {
        self.matched_total == 0
    }
}

/// A backing collection with its filter/sort/page state.
///
/// The ordered match list is cached as indices into `records` so that page
/// changes only re-slice.
pub struct Listing {
    records: Arc<[JobRecord]>,
    state: ListingState,
    page_size: usize,
    ordered: Vec<usize>,
}

impl Listing {
    pub fn new(records: Arc<[JobRecord]>, page_size: usize) -> Self {
        Self::from_state(records, page_size, ListingState::default())
    }

    pub fn from_state(records: Arc<[JobRecord]>, page_size: usize, state: ListingState) -> Self {
        let mut listing = Self {
            records,
            state,
            page_size,
            ordered: Vec::new(),
        };
        listing.recompute();
        listing
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn dispatch(&mut self, event: ListingEvent) -> ListingSnapshot {
        let (next, recompute) = reduce(&self.state, &event);
        if let ListingEvent::RecordsLoaded(records) = event {
            self.records = records;
        }
        self.state = next;
        if recompute == Recompute::Full {
            self.recompute();
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        let items = page_range(self.ordered.len(), self.state.page, self.page_size)
            .map(|range| {
                self.ordered[range]
                    .iter()
                    .map(|&i| self.records[i].clone())
                    .collect()
            })
            .unwrap_or_default();

        ListingSnapshot {
            items,
            matched_total: self.ordered.len(),
            page: self.state.page,
            page_size: self.page_size,
            total_pages: total_pages(self.ordered.len(), self.page_size),
            state: self.state.clone(),
        }
    }

    fn recompute(&mut self) {
        let records = &self.records;
        let filters = &self.state.filters;
        let search = normalize_search(&filters.search);

        let mut ordered: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, job)| matches(job, filters, &search))
            .map(|(i, _)| i)
            .collect();
        sort_by_mode(&mut ordered, self.state.sort, |&i| &records[i]);

        self.ordered = ordered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::filter::NEGOTIABLE;

    fn make_records(n: i64) -> Arc<[JobRecord]> {
        (1..=n)
            .map(|id| JobRecord {
                id,
                job_title: Some(format!("Job {id}")),
                salary: Some(if id % 2 == 0 {
                    format!("{id}-{} triệu", id + 5)
                } else {
                    "Thoả thuận".to_string()
                }),
                timestamp: Some(id.to_string()),
                ..Default::default()
            })
            .collect()
    }

    fn ids(snapshot: &ListingSnapshot) -> Vec<i64> {
        snapshot.items.iter().map(|j| j.id).collect()
    }

    #[test]
    fn test_reduce_resets_page_on_filter_change() {
        let state = ListingState {
            page: 4,
            ..Default::default()
        };
        for event in [
            ListingEvent::SetSearch("rust".into()),
            ListingEvent::SetLocation("Hà Nội".into()),
            ListingEvent::SetExperience("1 năm".into()),
            ListingEvent::SetSalary(NEGOTIABLE.into()),
            ListingEvent::SetSort(SortMode::Oldest),
            ListingEvent::ClearFilters,
        ] {
            let (next, recompute) = reduce(&state, &event);
            assert_eq!(next.page, 1, "{event:?} should reset the page");
            assert_eq!(recompute, Recompute::Full);
        }
    }

    #[test]
    fn test_reduce_go_to_page_only_slices() {
        let state = ListingState {
            filters: FilterState {
                search: "rust".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let (next, recompute) = reduce(&state, &ListingEvent::GoToPage(3));
        assert_eq!(next.page, 3);
        assert_eq!(next.filters, state.filters);
        assert_eq!(recompute, Recompute::Slice);
    }

    #[test]
    fn test_clear_filters_restores_default_sort() {
        let state = ListingState {
            filters: FilterState {
                salary: NEGOTIABLE.into(),
                ..Default::default()
            },
            sort: SortMode::SalaryLow,
            page: 2,
        };
        let (next, _) = reduce(&state, &ListingEvent::ClearFilters);
        assert_eq!(next, ListingState::default());
    }

    #[test]
    fn test_default_listing_is_newest_first() {
        let listing = Listing::new(make_records(23), 20);
        let snapshot = listing.snapshot();
        assert_eq!(snapshot.items.len(), 20);
        assert_eq!(snapshot.items[0].id, 23);
        assert_eq!(snapshot.matched_total, 23);
        assert_eq!(snapshot.total_pages, 2);
    }

    #[test]
    fn test_paging_through_twenty_three_records() {
        let mut listing = Listing::new(make_records(23), 20);
        assert_eq!(listing.dispatch(ListingEvent::GoToPage(2)).items.len(), 3);
        let past_end = listing.dispatch(ListingEvent::GoToPage(3));
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.matched_total, 23);
        assert!(!past_end.no_results());
    }

    #[test]
    fn test_filter_then_page_back_to_one() {
        let mut listing = Listing::new(make_records(30), 12);
        listing.dispatch(ListingEvent::GoToPage(3));
        let snapshot = listing.dispatch(ListingEvent::SetSalary(NEGOTIABLE.into()));
        assert_eq!(snapshot.page, 1);
        assert_eq!(snapshot.matched_total, 15);
        assert!(snapshot.items.iter().all(|j| j.id % 2 == 1));
    }

    #[test]
    fn test_same_state_same_output() {
        let records = make_records(40);
        let mut driven = Listing::new(records.clone(), 20);
        driven.dispatch(ListingEvent::SetSort(SortMode::SalaryHigh));
        driven.dispatch(ListingEvent::SetSearch("job 1".into()));
        driven.dispatch(ListingEvent::GoToPage(1));

        let direct = Listing::from_state(records, 20, driven.state().clone());
        assert_eq!(ids(&driven.snapshot()), ids(&direct.snapshot()));
    }

    #[test]
    fn test_one_shot_compute_matches_listing() {
        let records = make_records(45);
        let state = ListingState {
            filters: FilterState {
                search: "job".into(),
                ..Default::default()
            },
            sort: SortMode::SalaryLow,
            page: 2,
        };
        let listing = Listing::from_state(records.clone(), 20, state.clone());
        let direct = ListingSnapshot::compute(&records, state, 20);
        assert_eq!(ids(&direct), ids(&listing.snapshot()));
        assert_eq!(direct.matched_total, 45);
        assert_eq!(direct.total_pages, 3);
    }

    #[test]
    fn test_records_loaded_replaces_collection_and_keeps_filters() {
        let mut listing = Listing::new(make_records(5), 20);
        listing.dispatch(ListingEvent::SetSearch("job 1".into()));
        listing.dispatch(ListingEvent::GoToPage(2));

        let snapshot = listing.dispatch(ListingEvent::RecordsLoaded(make_records(12)));
        assert_eq!(snapshot.page, 1);
        assert_eq!(snapshot.state.filters.search, "job 1");
        // "Job 1", "Job 10", "Job 11", "Job 12"
        assert_eq!(snapshot.matched_total, 4);
    }

    #[test]
    fn test_empty_collection_reports_no_results() {
        let listing = Listing::new(Arc::from(Vec::new()), 20);
        let snapshot = listing.snapshot();
        assert!(snapshot.no_results());
        assert_eq!(snapshot.total_pages, 0);
    }

    #[test]
    fn test_backing_collection_is_untouched() {
        let records = make_records(10);
        let before: Vec<JobRecord> = records.to_vec();
        let mut listing = Listing::new(records.clone(), 3);
        listing.dispatch(ListingEvent::SetSort(SortMode::SalaryLow));
        listing.dispatch(ListingEvent::SetSalary("triệu".into()));
        assert_eq!(records.to_vec(), before);
    }

    #[test]
    fn test_event_wire_format() {
        let event: ListingEvent =
            serde_json::from_str(r#"{"type": "set_sort", "value": "salary-low"}"#).unwrap();
        assert!(matches!(event, ListingEvent::SetSort(SortMode::SalaryLow)));
        let event: ListingEvent = serde_json::from_str(r#"{"type": "clear_filters"}"#).unwrap();
        assert!(matches!(event, ListingEvent::ClearFilters));
        let event: ListingEvent =
            serde_json::from_str(r#"{"type": "go_to_page", "value": 2}"#).unwrap();
        assert!(matches!(event, ListingEvent::GoToPage(2)));
    }
}
