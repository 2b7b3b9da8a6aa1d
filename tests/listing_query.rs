use chrono::DateTime;
use pedilo_admin::domain::listing::{Listing, ListingDetails};
use pedilo_admin::domain::types::ListingId;
use pedilo_admin::listing_query::{ListingCounts, ListingTab, ViewState, project};
use proptest::prelude::*;

fn listing_strategy() -> impl Strategy<Value = (Option<String>, Option<String>, Option<bool>, Option<i64>)> {
    (
        proptest::option::of("[a-cA-C ]{0,6}"),
        proptest::option::of("[a-cA-C ]{0,6}"),
        proptest::option::of(any::<bool>()),
        proptest::option::of(0i64..50),
    )
}

fn records_strategy() -> impl Strategy<Value = Vec<Listing>> {
    proptest::collection::vec(listing_strategy(), 0..24).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (full_name, post_title, status, created))| Listing {
                id: ListingId::new(format!("id-{i}")).unwrap(),
                details: ListingDetails {
                    full_name,
                    post_title,
                    ..ListingDetails::default()
                },
                status,
                image_url: None,
                gallery: vec![],
                created_at: created
                    .and_then(|secs| DateTime::from_timestamp(secs, 0))
                    .map(|d| d.naive_utc()),
            })
            .collect()
    })
}

fn tab_strategy() -> impl Strategy<Value = ListingTab> {
    prop_oneof![
        Just(ListingTab::All),
        Just(ListingTab::Active),
        Just(ListingTab::Inactive)
    ]
}

fn position(records: &[Listing], listing: &Listing) -> usize {
    records.iter().position(|r| r.id == listing.id).unwrap()
}

proptest! {
    #[test]
    fn projection_is_an_ordered_subset_of_matching_records(
        records in records_strategy(),
        search in "[a-cA-C]{0,2}",
        tab in tab_strategy(),
    ) {
        let view = ViewState::new(search.clone(), tab);
        let projection = project(&records, &view);
        let needle = search.to_lowercase();

        let expected = records.iter().filter(|l| {
            let text = |f: &Option<String>| f.as_deref().is_some_and(|v| v.to_lowercase().contains(&needle));
            let text_ok = needle.is_empty() || text(&l.details.full_name) || text(&l.details.post_title);
            let tab_ok = match tab {
                ListingTab::All => true,
                ListingTab::Active => l.status == Some(true),
                ListingTab::Inactive => l.status == Some(false),
            };
            text_ok && tab_ok
        }).count();

        prop_assert_eq!(projection.ordered.len(), expected);
        for listing in &projection.ordered {
            prop_assert!(records.iter().any(|r| r.id == listing.id));
        }
    }

    #[test]
    fn counts_ignore_the_view(
        records in records_strategy(),
        search in "[a-c]{0,2}",
        tab in tab_strategy(),
    ) {
        let projection = project(&records, &ViewState::new(search, tab));
        let counts = projection.counts;

        prop_assert_eq!(counts, ListingCounts::of(&records));
        prop_assert_eq!(counts.total, records.len());
        prop_assert!(counts.active + counts.inactive <= counts.total);
    }

    #[test]
    fn projection_is_deterministic(
        records in records_strategy(),
        search in "[a-cA-C]{1,2}",
        tab in tab_strategy(),
    ) {
        let view = ViewState::new(search, tab);

        let first = project(&records, &view);
        let second = project(&records, &view);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn ordering_respects_dates_and_input_order(records in records_strategy(), tab in tab_strategy()) {
        let projection = project(&records, &ViewState::new("", tab));

        for pair in projection.ordered.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            match (a.created_at, b.created_at) {
                (None, Some(_)) => prop_assert!(false, "undated record before a dated one"),
                (Some(da), Some(db)) => match tab {
                    ListingTab::Inactive => prop_assert!(da <= db),
                    ListingTab::Active => prop_assert!(da >= db),
                    ListingTab::All => prop_assert!(position(&records, a) < position(&records, b)),
                },
                (None, None) => prop_assert!(position(&records, a) < position(&records, b)),
                (Some(_), None) => {}
            }
        }
    }
}
