use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use staybook_core::db::open_db_in_memory;
use staybook_core::repo::booking_repo::SqliteBookingRepository;
use staybook_core::repo::listing_repo::{ListingRepository, SqliteListingRepository};
use staybook_core::repo::review_repo::SqliteReviewRepository;
use staybook_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use staybook_core::serializer::booking::BookingInput;
use staybook_core::serializer::listing::ListingInput;
use staybook_core::serializer::review::ReviewInput;
use staybook_core::{BookingService, BookingStatus, FixedClock, Listing, ListingId, User, UserId};

fn setup() -> (Connection, UserId, ListingId) {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::new(&conn);
    let host = users
        .create_user(&User::new("host", "host@example.com"))
        .unwrap();
    let guest = users
        .create_user(&User::new("guest", "guest@example.com"))
        .unwrap();
    let mut listing = Listing::new(host, "Dune house", "Sylt", Decimal::new(10_000, 2), 4);
    listing.amenities = vec!["sauna".to_string()];
    let listing = SqliteListingRepository::new(&conn)
        .create_listing(&listing)
        .unwrap();
    (conn, guest, listing)
}

fn booking_json(conn: &Connection, guest: UserId, listing: ListingId) -> Value {
    let service = BookingService::new(
        SqliteListingRepository::new(conn),
        SqliteBookingRepository::new(conn),
        SqliteUserRepository::new(conn),
        SqliteReviewRepository::new(conn),
        FixedClock(NaiveDate::from_ymd_opt(2030, 12, 1).unwrap()),
    );
    let input: BookingInput = serde_json::from_value(json!({
        "listing_id": listing,
        "user_id": guest,
        "check_in_date": "2031-01-01",
        "check_out_date": "2031-01-04",
        "guests": 2,
    }))
    .unwrap();
    serde_json::to_value(service.create(&input).unwrap()).unwrap()
}

#[test]
fn booking_renders_nested_records_and_derived_fields() {
    let (conn, guest, listing) = setup();
    let value = booking_json(&conn, guest, listing);

    assert_eq!(value["check_in_date"], json!("2031-01-01"));
    assert_eq!(value["check_out_date"], json!("2031-01-04"));
    assert_eq!(value["total_price"], json!("300.00"));
    assert_eq!(value["duration"], json!(3));
    assert_eq!(value["status"], json!("pending"));
    assert_eq!(value["user"]["username"], json!("guest"));
    assert_eq!(value["listing"]["id"], json!(listing));
    assert_eq!(value["listing"]["price_per_night"], json!("100.00"));
    assert_eq!(value["listing"]["host"]["username"], json!("host"));
    assert_eq!(value["listing"]["average_rating"], Value::Null);
}

#[test]
fn booking_omits_write_only_references() {
    let (conn, guest, listing) = setup();
    let value = booking_json(&conn, guest, listing);
    let object = value.as_object().unwrap();

    assert!(!object.contains_key("listing_id"));
    assert!(!object.contains_key("user_id"));
    assert!(object.contains_key("created_at"));
    assert!(object["created_at"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn booking_input_ignores_read_only_keys() {
    let input: BookingInput = serde_json::from_value(json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "listing_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
        "user_id": "9a2d8f31-6b1c-4c39-a3c0-6f4c6d7e2b10",
        "check_in_date": "2031-01-01",
        "check_out_date": "2031-01-04",
        "guests": 2,
        "total_price": "1.00",
        "duration": 99,
        "created_at": "2020-01-01T00:00:00Z",
    }))
    .unwrap();

    assert_eq!(input.guests, 2);
    assert_eq!(input.status, BookingStatus::Pending);
    assert!(input.special_requests.is_empty());
}

#[test]
fn booking_input_rejects_malformed_dates() {
    let result = serde_json::from_value::<BookingInput>(json!({
        "listing_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
        "user_id": "9a2d8f31-6b1c-4c39-a3c0-6f4c6d7e2b10",
        "check_in_date": "01/01/2031",
        "check_out_date": "2031-01-04",
        "guests": 2,
    }));
    assert!(result.is_err());
}

#[test]
fn listing_input_applies_defaults() {
    let input: ListingInput = serde_json::from_value(json!({
        "host_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
        "title": "Dune house",
        "price_per_night": "100.00",
        "location": "Sylt",
        "max_guests": 4,
        "average_rating": 5.0,
    }))
    .unwrap();

    assert_eq!(input.bedrooms, 1);
    assert_eq!(input.bathrooms, 1);
    assert_eq!(input.amenities, json!([]));
    assert!(input.available);
    assert_eq!(input.price_per_night, Decimal::new(10_000, 2));
}

#[test]
fn listing_input_keeps_raw_amenities_for_validation() {
    let input: ListingInput = serde_json::from_value(json!({
        "host_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
        "title": "Dune house",
        "price_per_night": 100,
        "location": "Sylt",
        "max_guests": -1,
        "amenities": "sauna",
    }))
    .unwrap();

    assert_eq!(input.amenities, json!("sauna"));
    assert_eq!(input.max_guests, -1);
}

#[test]
fn review_input_accepts_out_of_range_rating() {
    let input: ReviewInput = serde_json::from_value(json!({
        "user_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
        "booking": "9a2d8f31-6b1c-4c39-a3c0-6f4c6d7e2b10",
        "rating": 11,
    }))
    .unwrap();

    assert_eq!(input.rating, 11);
    assert!(input.comment.is_empty());
}

#[test]
fn listing_detail_renders_amenities_and_rating_fields() {
    let (conn, _, listing) = setup();
    let service = staybook_core::ListingService::new(
        SqliteListingRepository::new(&conn),
        SqliteUserRepository::new(&conn),
        SqliteReviewRepository::new(&conn),
    );
    let value = serde_json::to_value(service.get(listing).unwrap()).unwrap();

    assert_eq!(value["amenities"], json!(["sauna"]));
    assert_eq!(value["total_reviews"], json!(0));
    assert_eq!(value["average_rating"], Value::Null);
    assert_eq!(value["reviews"], json!([]));
    assert!(value.get("host_id").is_none());
}
