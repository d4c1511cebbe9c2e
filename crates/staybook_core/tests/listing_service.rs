use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use staybook_core::db::open_db_in_memory;
use staybook_core::repo::booking_repo::{BookingRepository, SqliteBookingRepository};
use staybook_core::repo::listing_repo::{ListingListQuery, SqliteListingRepository};
use staybook_core::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use staybook_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use staybook_core::serializer::listing::ListingInput;
use staybook_core::{
    Booking, ListingId, ListingService, Review, ServiceError, Stay, User, UserId, ValidationError,
};
use std::collections::HashSet;
use uuid::Uuid;

type Service<'c> = ListingService<
    SqliteListingRepository<'c>,
    SqliteUserRepository<'c>,
    SqliteReviewRepository<'c>,
>;

fn service(conn: &Connection) -> Service<'_> {
    ListingService::new(
        SqliteListingRepository::new(conn),
        SqliteUserRepository::new(conn),
        SqliteReviewRepository::new(conn),
    )
}

fn seed_user(conn: &Connection, username: &str) -> UserId {
    SqliteUserRepository::new(conn)
        .create_user(
            &User::new(username, format!("{username}@example.com")).with_names("Jo", "Host"),
        )
        .unwrap()
}

fn input(host: UserId) -> ListingInput {
    ListingInput {
        host_id: host,
        title: "Harbour loft".to_string(),
        description: "Top floor, river view".to_string(),
        price_per_night: Decimal::new(12_550, 2),
        location: "Lisbon, Portugal".to_string(),
        property_type: "apartment".to_string(),
        max_guests: 3,
        bedrooms: 2,
        bathrooms: 1,
        amenities: json!(["wifi", "kitchen"]),
        available: true,
    }
}

fn rejection(result: Result<impl std::fmt::Debug, ServiceError>) -> ValidationError {
    match result {
        Err(ServiceError::Validation(err)) => err,
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn add_review(conn: &Connection, listing: ListingId, guest: UserId, rating: u8, month: u32) {
    let stay = Stay::new(
        NaiveDate::from_ymd_opt(2031, month, 1).unwrap(),
        NaiveDate::from_ymd_opt(2031, month, 3).unwrap(),
    )
    .unwrap();
    let booking = SqliteBookingRepository::new(conn)
        .create_booking(&Booking::new(listing, guest, stay, 1, Decimal::new(200, 0)))
        .unwrap();
    SqliteReviewRepository::new(conn)
        .create_review(&Review::new(booking, guest, rating, "fine"))
        .unwrap();
}

#[test]
fn create_returns_full_representation() {
    let conn = open_db_in_memory().unwrap();
    let host = seed_user(&conn, "host");

    let repr = service(&conn).create(&input(host)).unwrap();
    assert_eq!(repr.title, "Harbour loft");
    assert_eq!(repr.price_per_night, Decimal::new(12_550, 2));
    assert_eq!(repr.amenities, vec!["wifi".to_string(), "kitchen".to_string()]);
    assert_eq!(repr.host.id, host);
    assert_eq!(repr.host.username, "host");
    assert!(repr.reviews.is_empty());
    assert_eq!(repr.average_rating, None);
    assert_eq!(repr.total_reviews, 0);
}

#[test]
fn blank_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let host = seed_user(&conn, "host");
    let mut payload = input(host);
    payload.title = "   ".to_string();

    let err = rejection(service(&conn).create(&payload));
    assert_eq!(err.to_string(), "This field may not be blank.");
    assert_eq!(err.field(), Some("title"));
}

#[test]
fn non_positive_price_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let host = seed_user(&conn, "host");

    for price in [Decimal::ZERO, Decimal::new(-1, 0)] {
        let mut payload = input(host);
        payload.price_per_night = price;
        let err = rejection(service(&conn).validate(&payload));
        assert_eq!(err.to_string(), "Price per night must be positive.");
    }
}

#[test]
fn zero_capacity_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let host = seed_user(&conn, "host");
    let mut payload = input(host);
    payload.max_guests = 0;

    let err = rejection(service(&conn).validate(&payload));
    assert_eq!(err.to_string(), "Max guests must be at least 1.");
}

#[test]
fn non_list_amenities_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let host = seed_user(&conn, "host");

    for amenities in [json!("wifi"), json!({"wifi": true}), json!([1, 2])] {
        let mut payload = input(host);
        payload.amenities = amenities;
        let err = rejection(service(&conn).validate(&payload));
        assert_eq!(err.to_string(), "Amenities must be a list.");
    }
}

#[test]
fn unknown_host_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let err = rejection(service(&conn).create(&input(Uuid::new_v4())));

    assert_eq!(err.to_string(), "Invalid user ID.");
    assert_eq!(err.field(), Some("host_id"));
}

#[test]
fn update_replaces_fields_and_keeps_identity() {
    let conn = open_db_in_memory().unwrap();
    let host = seed_user(&conn, "host");
    let service = service(&conn);
    let created = service.create(&input(host)).unwrap();

    let mut payload = input(host);
    payload.title = "Harbour loft (renovated)".to_string();
    payload.amenities = json!([]);
    payload.available = false;
    let updated = service.update(created.id, &payload).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.title, "Harbour loft (renovated)");
    assert!(updated.amenities.is_empty());
    assert!(!updated.available);
}

#[test]
fn update_of_missing_listing_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let host = seed_user(&conn, "host");
    let err = service(&conn)
        .update(Uuid::new_v4(), &input(host))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "listing", .. }));
}

#[test]
fn rating_summary_averages_all_reviews() {
    let conn = open_db_in_memory().unwrap();
    let host = seed_user(&conn, "host");
    let guest = seed_user(&conn, "guest");
    let service = service(&conn);
    let listing = service.create(&input(host)).unwrap().id;

    add_review(&conn, listing, guest, 5, 1);
    add_review(&conn, listing, guest, 4, 2);
    add_review(&conn, listing, guest, 4, 3);

    let repr = service.get(listing).unwrap();
    assert_eq!(repr.total_reviews, 3);
    assert_eq!(repr.average_rating, Some(4.33));
    assert_eq!(repr.reviews.len(), 3);
    assert!(repr.reviews.iter().all(|review| review.user.id == guest));
}

#[test]
fn list_filters_by_location_and_availability() {
    let conn = open_db_in_memory().unwrap();
    let host = seed_user(&conn, "host");
    let service = service(&conn);

    let lisbon = service.create(&input(host)).unwrap().id;
    let mut porto_payload = input(host);
    porto_payload.location = "Porto, Portugal".to_string();
    let porto = service.create(&porto_payload).unwrap().id;
    let mut hidden_payload = input(host);
    hidden_payload.available = false;
    let hidden = service.create(&hidden_payload).unwrap().id;

    let in_lisbon: HashSet<_> = service
        .list(&ListingListQuery {
            location: Some("lisbon".to_string()),
            ..ListingListQuery::default()
        })
        .unwrap()
        .into_iter()
        .map(|summary| summary.id)
        .collect();
    assert_eq!(in_lisbon, HashSet::from([lisbon, hidden]));

    let bookable: HashSet<_> = service
        .list(&ListingListQuery {
            available_only: true,
            ..ListingListQuery::default()
        })
        .unwrap()
        .into_iter()
        .map(|summary| summary.id)
        .collect();
    assert_eq!(bookable, HashSet::from([lisbon, porto]));
}

#[test]
fn list_paginates() {
    let conn = open_db_in_memory().unwrap();
    let host = seed_user(&conn, "host");
    let service = service(&conn);
    for _ in 0..3 {
        service.create(&input(host)).unwrap();
    }

    let first_page = service
        .list(&ListingListQuery {
            limit: Some(2),
            ..ListingListQuery::default()
        })
        .unwrap();
    let second_page = service
        .list(&ListingListQuery {
            limit: Some(2),
            offset: 2,
            ..ListingListQuery::default()
        })
        .unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(second_page.len(), 1);
}
