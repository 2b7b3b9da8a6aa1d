//! Filtering, ordering and tab counts for the listings table.
//!
//! [`project`] is a pure function of the listing snapshot and the current
//! [`ViewState`]; it never mutates either and never fails.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::listing::Listing;

/// Coarse status filter selected in the dashboard. Also selects sort order.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListingTab {
    #[default]
    All,
    Active,
    Inactive,
}

impl ListingTab {
    /// String representation used in query strings and templates.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parses a query string value; anything unknown selects [`ListingTab::All`].
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            _ => Self::All,
        }
    }

    fn admits(self, listing: &Listing) -> bool {
        match self {
            Self::All => true,
            Self::Active => listing.is_active(),
            Self::Inactive => listing.is_inactive(),
        }
    }
}

/// Search text plus selected tab.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub search_text: String,
    pub tab: ListingTab,
}

impl ViewState {
    pub fn new(search_text: impl Into<String>, tab: ListingTab) -> Self {
        Self {
            search_text: search_text.into(),
            tab,
        }
    }
}

/// Per-tab totals over the whole snapshot.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ListingCounts {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl ListingCounts {
    /// Counts every record regardless of search text or tab.
    pub fn of(records: &[Listing]) -> Self {
        records.iter().fold(Self::default(), |mut counts, listing| {
            counts.total += 1;
            match listing.status {
                Some(true) => counts.active += 1,
                Some(false) => counts.inactive += 1,
                None => {}
            }
            counts
        })
    }
}

/// Rows to render, in display order, plus tab counts.
#[derive(Debug, PartialEq)]
pub struct ListingProjection<'a> {
    pub ordered: Vec<&'a Listing>,
    pub counts: ListingCounts,
}

/// Filters and orders `records` for `view`.
pub fn project<'a>(records: &'a [Listing], view: &ViewState) -> ListingProjection<'a> {
    let needle = view.search_text.to_lowercase();

    let mut ordered: Vec<&Listing> = records
        .iter()
        .filter(|listing| matches_search(listing, &needle) && view.tab.admits(listing))
        .collect();

    // `sort_by` is stable, which the comparator relies on for pairs it treats
    // as equal.
    ordered.sort_by(|a, b| compare_created(a, b, view.tab));

    ListingProjection {
        ordered,
        counts: ListingCounts::of(records),
    }
}

fn matches_search(listing: &Listing, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let contains = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|value| value.to_lowercase().contains(needle))
    };
    contains(&listing.details.full_name) || contains(&listing.details.post_title)
}

/// Dated records come before undated ones on every tab. Between two dated
/// records only `inactive` (oldest first) and `active` (newest first) impose
/// an order; on `all` they compare equal and keep snapshot order.
fn compare_created(a: &Listing, b: &Listing, tab: ListingTab) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(date_a), Some(date_b)) => match tab {
            ListingTab::Inactive => date_a.cmp(&date_b),
            ListingTab::Active => date_b.cmp(&date_a),
            ListingTab::All => Ordering::Equal,
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListingDetails;
    use crate::domain::types::ListingId;
    use chrono::{DateTime, NaiveDateTime};

    fn at(secs: i64) -> NaiveDateTime {
        DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }

    fn listing(id: &str, name: &str, status: Option<bool>, created: Option<i64>) -> Listing {
        Listing {
            id: ListingId::new(id).unwrap(),
            details: ListingDetails {
                full_name: Some(name.to_string()),
                ..ListingDetails::default()
            },
            status,
            image_url: None,
            gallery: vec![],
            created_at: created.map(at),
        }
    }

    fn ids(projection: &ListingProjection<'_>) -> Vec<String> {
        projection
            .ordered
            .iter()
            .map(|l| l.id.as_str().to_string())
            .collect()
    }

    #[test]
    fn active_tab_keeps_only_active_records() {
        let records = vec![
            listing("1", "Ana", Some(true), Some(10)),
            listing("2", "Bob", Some(false), Some(20)),
        ];

        let projection = project(&records, &ViewState::new("", ListingTab::Active));

        assert_eq!(ids(&projection), vec!["1"]);
        assert_eq!(
            projection.counts,
            ListingCounts {
                total: 2,
                active: 1,
                inactive: 1
            }
        );
    }

    #[test]
    fn search_is_case_insensitive_on_full_name() {
        let records = vec![
            listing("1", "Ana", Some(true), Some(10)),
            listing("2", "Bob", Some(false), Some(20)),
        ];

        let projection = project(&records, &ViewState::new("bob", ListingTab::All));

        assert_eq!(ids(&projection), vec!["2"]);
    }

    #[test]
    fn search_matches_post_title() {
        let mut record = listing("1", "Ana", Some(true), None);
        record.details.post_title = Some("Plomería urgente".to_string());
        let records = vec![record, listing("2", "Bob", Some(true), None)];

        let projection = project(&records, &ViewState::new("PLOMER", ListingTab::All));

        assert_eq!(ids(&projection), vec!["1"]);
    }

    #[test]
    fn missing_names_only_match_empty_search() {
        let mut record = listing("1", "Ana", None, None);
        record.details.full_name = None;
        let records = vec![record];

        assert_eq!(
            project(&records, &ViewState::new("", ListingTab::All))
                .ordered
                .len(),
            1
        );
        assert!(
            project(&records, &ViewState::new("a", ListingTab::All))
                .ordered
                .is_empty()
        );
    }

    #[test]
    fn missing_status_is_neither_active_nor_inactive() {
        let records = vec![listing("1", "Ana", None, None)];

        assert!(
            project(&records, &ViewState::new("", ListingTab::Active))
                .ordered
                .is_empty()
        );
        assert!(
            project(&records, &ViewState::new("", ListingTab::Inactive))
                .ordered
                .is_empty()
        );
        let counts = ListingCounts::of(&records);
        assert_eq!((counts.total, counts.active, counts.inactive), (1, 0, 0));
    }

    #[test]
    fn inactive_tab_sorts_oldest_first() {
        let records = vec![
            listing("new", "A", Some(false), Some(30)),
            listing("old", "B", Some(false), Some(10)),
            listing("mid", "C", Some(false), Some(20)),
        ];

        let projection = project(&records, &ViewState::new("", ListingTab::Inactive));

        assert_eq!(ids(&projection), vec!["old", "mid", "new"]);
    }

    #[test]
    fn active_tab_sorts_newest_first() {
        let records = vec![
            listing("old", "A", Some(true), Some(10)),
            listing("new", "B", Some(true), Some(30)),
            listing("mid", "C", Some(true), Some(20)),
        ];

        let projection = project(&records, &ViewState::new("", ListingTab::Active));

        assert_eq!(ids(&projection), vec!["new", "mid", "old"]);
    }

    // Legacy behaviour kept on purpose: the `all` tab does not order dated
    // records by date at all.
    #[test]
    fn all_tab_keeps_snapshot_order_between_dated_records() {
        let records = vec![
            listing("old", "A", Some(true), Some(10)),
            listing("new", "B", Some(false), Some(30)),
            listing("mid", "C", None, Some(20)),
        ];

        let projection = project(&records, &ViewState::new("", ListingTab::All));

        assert_eq!(ids(&projection), vec!["old", "new", "mid"]);
    }

    #[test]
    fn dated_records_precede_undated_records_on_every_tab() {
        let records = vec![
            listing("undated", "A", Some(false), None),
            listing("dated", "B", Some(false), Some(10)),
        ];

        for tab in [ListingTab::All, ListingTab::Inactive] {
            let projection = project(&records, &ViewState::new("", tab));
            assert_eq!(ids(&projection), vec!["dated", "undated"]);
        }
    }

    #[test]
    fn undated_records_keep_their_relative_order() {
        let records = vec![
            listing("b", "B", Some(true), None),
            listing("a", "A", Some(true), None),
            listing("c", "C", Some(true), None),
        ];

        for tab in [ListingTab::All, ListingTab::Active] {
            let projection = project(&records, &ViewState::new("", tab));
            assert_eq!(ids(&projection), vec!["b", "a", "c"]);
        }
    }

    #[test]
    fn empty_snapshot_projects_to_nothing() {
        let projection = project(&[], &ViewState::default());

        assert!(projection.ordered.is_empty());
        assert_eq!(projection.counts, ListingCounts::default());
    }

    #[test]
    fn unknown_tab_values_fall_back_to_all() {
        assert_eq!(ListingTab::parse_lenient("inactive"), ListingTab::Inactive);
        assert_eq!(ListingTab::parse_lenient("archived"), ListingTab::All);
    }
}
