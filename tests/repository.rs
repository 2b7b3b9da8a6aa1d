use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use pedilo_admin::domain::category::{CategoryUpdate, NewCategory};
use pedilo_admin::domain::listing::{ListingDetails, ListingUpdate, NewListing};
use pedilo_admin::domain::types::{
    CategoryId, CategoryName, ImageUrl, ListingId, RatingId, SubcategoryName,
};
use pedilo_admin::repository::{
    CategoryReader, CategoryWriter, DieselRepository, ListingReader, ListingWriter, RatingReader,
    RatingWriter,
};
use pedilo_admin::schema::{listing_gallery, ratings};

mod common;

fn at(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
}

fn url(value: &str) -> ImageUrl {
    ImageUrl::new(value).expect("valid url")
}

fn sample_new_listing(name: &str, secs: i64) -> NewListing {
    NewListing {
        details: ListingDetails {
            full_name: Some(name.to_string()),
            post_title: Some(format!("Servicio de {name}")),
            ..ListingDetails::default()
        },
        status: Some(false),
        image_url: None,
        created_at: at(secs),
    }
}

fn insert_rating(test_db: &common::TestDb, id: &str, listing_id: &ListingId, secs: i64) {
    insert_scored_rating(test_db, id, listing_id, secs, 4.0);
}

fn insert_scored_rating(
    test_db: &common::TestDb,
    id: &str,
    listing_id: &ListingId,
    secs: i64,
    score: f64,
) {
    let mut conn = test_db.pool().get().expect("should acquire DB connection");
    diesel::insert_into(ratings::table)
        .values((
            ratings::id.eq(id),
            ratings::listing_id.eq(listing_id.as_str()),
            ratings::score.eq(score),
            ratings::text.eq("Muy bueno"),
            ratings::timestamp.eq(at(secs)),
        ))
        .execute(&mut conn)
        .expect("should insert rating");
}

#[test]
fn listings_are_read_back_in_insertion_order() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let first = repo
        .create_listing(&sample_new_listing("Zoe", 30))
        .expect("should create listing");
    let second = repo
        .create_listing(&sample_new_listing("Ana", 10))
        .expect("should create listing");

    let listings = repo.list_listings().expect("should list listings");
    let ids: Vec<&ListingId> = listings.iter().map(|l| &l.id).collect();
    assert_eq!(ids, vec![&first.id, &second.id]);
    assert_eq!(listings[0].status, Some(false));
    assert_eq!(listings[0].created_at, Some(at(30)));
    assert!(listings[0].gallery.is_empty());
}

#[test]
fn update_overwrites_every_editable_field() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let listing = repo
        .create_listing(&sample_new_listing("Ana", 10))
        .expect("should create listing");

    let update = ListingUpdate {
        details: ListingDetails {
            full_name: Some("Ana María".to_string()),
            phone: Some("555-1234".to_string()),
            ..ListingDetails::default()
        },
        status: None,
        image_url: Some(url("https://img.test/ana.png")),
    };
    let affected = repo
        .update_listing(&listing.id, &update)
        .expect("should update listing");
    assert_eq!(affected, 1);

    let stored = repo
        .get_listing_by_id(&listing.id)
        .expect("should read listing")
        .expect("listing should exist");
    assert_eq!(stored.details, update.details);
    assert_eq!(stored.details.post_title, None);
    assert_eq!(stored.status, None);
    assert_eq!(stored.image_url, update.image_url);
    assert_eq!(stored.created_at, Some(at(10)));

    let missing = ListingId::new("missing").unwrap();
    assert_eq!(repo.update_listing(&missing, &update).unwrap(), 0);
    assert_eq!(repo.set_listing_status(&missing, true).unwrap(), 0);
}

#[test]
fn gallery_keeps_append_order_and_removes_by_url() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let listing = repo
        .create_listing(&sample_new_listing("Ana", 10))
        .expect("should create listing");

    repo.append_gallery_images(&listing.id, &[url("https://img.test/1.png"), url("https://img.test/2.png")])
        .expect("should append");
    repo.append_gallery_images(&listing.id, &[url("https://img.test/3.png")])
        .expect("should append");
    let removed = repo
        .remove_gallery_image(&listing.id, &url("https://img.test/2.png"))
        .expect("should remove");
    assert_eq!(removed, 1);

    let stored = repo.get_listing_by_id(&listing.id).unwrap().unwrap();
    let gallery: Vec<&str> = stored.gallery.iter().map(ImageUrl::as_str).collect();
    assert_eq!(gallery, vec!["https://img.test/1.png", "https://img.test/3.png"]);

    let missing = ListingId::new("missing").unwrap();
    assert_eq!(
        repo.append_gallery_images(&missing, &[url("https://img.test/4.png")])
            .unwrap(),
        0
    );
}

#[test]
fn deleting_listing_removes_gallery_and_ratings() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let listing = repo
        .create_listing(&sample_new_listing("Ana", 10))
        .expect("should create listing");
    repo.append_gallery_images(&listing.id, &[url("https://img.test/1.png")])
        .expect("should append");
    insert_rating(&test_db, "r1", &listing.id, 100);

    assert_eq!(repo.delete_listing(&listing.id).unwrap(), 1);

    assert!(repo.list_listings().unwrap().is_empty());
    let mut conn = test_db.pool().get().unwrap();
    let gallery_rows: i64 = listing_gallery::table.count().get_result(&mut conn).unwrap();
    let rating_rows: i64 = ratings::table.count().get_result(&mut conn).unwrap();
    assert_eq!((gallery_rows, rating_rows), (0, 0));
}

#[test]
fn ratings_are_listed_newest_first_and_deleted_individually() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let listing = repo
        .create_listing(&sample_new_listing("Ana", 10))
        .expect("should create listing");
    insert_rating(&test_db, "old", &listing.id, 100);
    insert_rating(&test_db, "new", &listing.id, 200);

    let listed = repo.list_ratings(&listing.id).expect("should list ratings");
    let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old"]);

    let deleted = repo
        .delete_rating(&listing.id, &RatingId::new("old").unwrap())
        .expect("should delete rating");
    assert_eq!(deleted, 1);
    assert_eq!(repo.list_ratings(&listing.id).unwrap().len(), 1);
}

#[test]
fn malformed_rating_rows_do_not_hide_the_rest() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let listing = repo
        .create_listing(&sample_new_listing("Ana", 10))
        .expect("should create listing");
    insert_rating(&test_db, "good", &listing.id, 100);
    insert_scored_rating(&test_db, "negative", &listing.id, 200, -1.0);
    insert_rating(&test_db, "   ", &listing.id, 300);

    let listed = repo.list_ratings(&listing.id).expect("should list ratings");
    let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["negative", "good"]);
    assert_eq!(listed[0].score.get(), -1.0);

    let deleted = repo
        .delete_rating(&listing.id, &RatingId::new("negative").unwrap())
        .expect("should delete rating");
    assert_eq!(deleted, 1);
}

#[test]
fn category_crud_replaces_subcategories() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_category(&NewCategory {
            name: CategoryName::new("Hogar").unwrap(),
            subcategories: vec![
                SubcategoryName::new("Plomería").unwrap(),
                SubcategoryName::new("Pintura").unwrap(),
            ],
            icon_url: None,
            created_at: Utc::now().naive_utc(),
        })
        .expect("should create category");

    let update = CategoryUpdate {
        name: CategoryName::new("Hogar y jardín").unwrap(),
        subcategories: vec![SubcategoryName::new("Jardinería").unwrap()],
        icon_url: Some(url("https://img.test/hogar.png")),
    };
    assert_eq!(repo.update_category(&created.id, &update).unwrap(), 1);

    let stored = repo
        .get_category_by_id(&created.id)
        .unwrap()
        .expect("category should exist");
    assert_eq!(stored.name.as_str(), "Hogar y jardín");
    let subs: Vec<&str> = stored.subcategories.iter().map(|s| s.as_str()).collect();
    assert_eq!(subs, vec!["Jardinería"]);
    assert_eq!(stored.icon_url, update.icon_url);

    assert_eq!(repo.delete_category(&created.id).unwrap(), 1);
    assert!(repo.list_categories().unwrap().is_empty());
    let missing = CategoryId::new("missing").unwrap();
    assert_eq!(repo.update_category(&missing, &update).unwrap(), 0);
}
