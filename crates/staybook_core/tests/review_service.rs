use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use staybook_core::db::open_db_in_memory;
use staybook_core::repo::booking_repo::{BookingRepository, SqliteBookingRepository};
use staybook_core::repo::listing_repo::{ListingRepository, SqliteListingRepository};
use staybook_core::repo::review_repo::SqliteReviewRepository;
use staybook_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use staybook_core::serializer::review::ReviewInput;
use staybook_core::{
    Booking, BookingId, Listing, ListingId, ReviewService, ServiceError, Stay, User, UserId,
    UserService, ValidationError,
};
use uuid::Uuid;

type Service<'c> = ReviewService<
    SqliteReviewRepository<'c>,
    SqliteBookingRepository<'c>,
    SqliteUserRepository<'c>,
>;

struct Fixture {
    conn: Connection,
    guest: UserId,
    listing: ListingId,
    booking: BookingId,
}

fn setup() -> Fixture {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::new(&conn);
    let host = users
        .create_user(&User::new("host", "host@example.com"))
        .unwrap();
    let guest = users
        .create_user(&User::new("guest", "guest@example.com").with_names("Grace", "Hopper"))
        .unwrap();
    let listing = SqliteListingRepository::new(&conn)
        .create_listing(&Listing::new(host, "Chalet", "Zermatt", Decimal::new(400, 0), 8))
        .unwrap();
    let stay = Stay::new(
        NaiveDate::from_ymd_opt(2031, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2031, 2, 8).unwrap(),
    )
    .unwrap();
    let booking = SqliteBookingRepository::new(&conn)
        .create_booking(&Booking::new(listing, guest, stay, 4, Decimal::new(2_800, 0)))
        .unwrap();
    Fixture {
        conn,
        guest,
        listing,
        booking,
    }
}

fn service(conn: &Connection) -> Service<'_> {
    ReviewService::new(
        SqliteReviewRepository::new(conn),
        SqliteBookingRepository::new(conn),
        SqliteUserRepository::new(conn),
    )
}

fn input(fixture: &Fixture, rating: i64) -> ReviewInput {
    ReviewInput {
        user_id: fixture.guest,
        booking: fixture.booking,
        rating,
        comment: "Great views".to_string(),
    }
}

fn rejection(result: Result<impl std::fmt::Debug, ServiceError>) -> ValidationError {
    match result {
        Err(ServiceError::Validation(err)) => err,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn rating_bounds_are_inclusive() {
    let fixture = setup();
    let service = service(&fixture.conn);

    for rating in [1, 5] {
        let repr = service.create(&input(&fixture, rating)).unwrap();
        assert_eq!(i64::from(repr.rating), rating);
    }
    for rating in [0, 6, -3, 100] {
        let err = rejection(service.create(&input(&fixture, rating)));
        assert_eq!(err.to_string(), "Rating must be between 1 and 5.");
        assert_eq!(err.field(), Some("rating"));
    }
}

#[test]
fn unknown_booking_is_rejected() {
    let fixture = setup();
    let mut payload = input(&fixture, 4);
    payload.booking = Uuid::new_v4();

    let err = rejection(service(&fixture.conn).create(&payload));
    assert_eq!(err.to_string(), "Invalid booking ID.");
    assert_eq!(err.field(), Some("booking"));
}

#[test]
fn unknown_reviewer_is_rejected() {
    let fixture = setup();
    let mut payload = input(&fixture, 4);
    payload.user_id = Uuid::new_v4();

    let err = rejection(service(&fixture.conn).create(&payload));
    assert_eq!(err.to_string(), "Invalid user ID.");
}

#[test]
fn rating_is_checked_before_references() {
    let fixture = setup();
    let mut payload = input(&fixture, 9);
    payload.booking = Uuid::new_v4();

    let err = rejection(service(&fixture.conn).validate(&payload));
    assert_eq!(err, ValidationError::RatingOutOfRange(9));
}

#[test]
fn create_nests_reviewer() {
    let fixture = setup();
    let repr = service(&fixture.conn).create(&input(&fixture, 4)).unwrap();

    assert_eq!(repr.booking, fixture.booking);
    assert_eq!(repr.user.id, fixture.guest);
    assert_eq!(repr.user.first_name, "Grace");
    assert_eq!(repr.comment, "Great views");
}

#[test]
fn update_replaces_rating_and_comment() {
    let fixture = setup();
    let service = service(&fixture.conn);
    let created = service.create(&input(&fixture, 2)).unwrap();

    let mut payload = input(&fixture, 5);
    payload.comment = "Host fixed the heating".to_string();
    let updated = service.update(created.id, &payload).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.rating, 5);
    assert_eq!(updated.comment, "Host fixed the heating");
}

#[test]
fn invalid_update_leaves_review_unchanged() {
    let fixture = setup();
    let service = service(&fixture.conn);
    let created = service.create(&input(&fixture, 3)).unwrap();

    rejection(service.update(created.id, &input(&fixture, 0)));
    assert_eq!(service.get(created.id).unwrap().rating, 3);
}

#[test]
fn list_for_listing_collects_reviews_across_bookings() {
    let fixture = setup();
    let service = service(&fixture.conn);
    service.create(&input(&fixture, 5)).unwrap();
    service.create(&input(&fixture, 3)).unwrap();

    let reviews = service.list_for_listing(fixture.listing).unwrap();
    let mut ratings: Vec<_> = reviews.iter().map(|review| review.rating).collect();
    ratings.sort_unstable();
    assert_eq!(ratings, vec![3, 5]);

    assert!(service.list_for_listing(Uuid::new_v4()).unwrap().is_empty());
}

#[test]
fn user_service_returns_read_only_identity() {
    let fixture = setup();
    let users = UserService::new(SqliteUserRepository::new(&fixture.conn));

    let repr = users.get(fixture.guest).unwrap();
    assert_eq!(repr.username, "guest");
    assert_eq!(repr.email, "guest@example.com");

    let err = users.get(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "user", .. }));
}
