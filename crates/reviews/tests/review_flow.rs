//! Review flow tests against a live PostgreSQL instance.
//!
//! These are marked `#[ignore]` by default because they need a running
//! database with `DATABASE_URL` set.
//!
//! Run with: `cargo test --test review_flow -- --ignored`

use chrono::NaiveDate;
use core_types::{Apartment, Customer, EngineError, Owner};
use database::{Store, connect, run_migrations};
use reservations::ReservationManager;
use reviews::ReviewManager;

const OWNER_ID: i32 = 920;
const CUSTOMER_ID: i32 = 921;
const APARTMENT_ID: i32 = 922;

fn day(month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, d).unwrap()
}

async fn setup() -> (Store, ReservationManager, ReviewManager) {
    let pool = connect().await.expect("DATABASE_URL must point at a running PostgreSQL");
    run_migrations(&pool).await.expect("migrations failed");
    let store = Store::new(pool);

    store.delete_apartment(APARTMENT_ID).await.unwrap();
    store.delete_customer(CUSTOMER_ID).await.unwrap();
    store.delete_owner(OWNER_ID).await.unwrap();

    store
        .add_owner(&Owner { owner_id: OWNER_ID, name: "Drew".to_string() })
        .await
        .unwrap();
    store
        .add_customer(&Customer { customer_id: CUSTOMER_ID, name: "Eli".to_string() })
        .await
        .unwrap();
    store
        .add_apartment(&Apartment {
            apartment_id: APARTMENT_ID,
            address: "4 Mill Street".to_string(),
            city: "Porto".to_string(),
            country: "Portugal".to_string(),
            size: 48,
        })
        .await
        .unwrap();
    store.assign_owner(OWNER_ID, APARTMENT_ID).await.unwrap();

    let reservations = ReservationManager::new(store.clone());
    let reviews = ReviewManager::new(store.clone());
    (store, reservations, reviews)
}

#[tokio::test]
#[ignore] // Requires PostgreSQL running
async fn review_gated_on_completed_stay() {
    let (_store, reservations, reviews) = setup().await;

    reservations
        .book(CUSTOMER_ID, APARTMENT_ID, day(1, 10), day(1, 14), 400.0)
        .await
        .unwrap();

    // Dated mid-stay: the reservation has not ended yet.
    let early = reviews
        .submit(CUSTOMER_ID, APARTMENT_ID, day(1, 12), 8, "lovely")
        .await;
    assert!(matches!(early, Err(EngineError::NotEligible)));

    // Checkout day itself is fine.
    reviews
        .submit(CUSTOMER_ID, APARTMENT_ID, day(1, 14), 8, "lovely")
        .await
        .unwrap();
}

#[tokio::test]
#[ignore] // Requires PostgreSQL running
async fn duplicate_review_is_a_conflict() {
    let (_store, reservations, reviews) = setup().await;

    reservations
        .book(CUSTOMER_ID, APARTMENT_ID, day(2, 1), day(2, 4), 300.0)
        .await
        .unwrap();
    reviews
        .submit(CUSTOMER_ID, APARTMENT_ID, day(2, 5), 7, "good")
        .await
        .unwrap();

    let second = reviews
        .submit(CUSTOMER_ID, APARTMENT_ID, day(2, 6), 9, "even better")
        .await;
    assert!(matches!(second, Err(EngineError::Conflict(_))));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL running
async fn update_keeps_the_review_timeline_monotonic() {
    let (store, reservations, reviews) = setup().await;

    reservations
        .book(CUSTOMER_ID, APARTMENT_ID, day(3, 1), day(3, 4), 300.0)
        .await
        .unwrap();
    reviews
        .submit(CUSTOMER_ID, APARTMENT_ID, day(3, 10), 6, "fine")
        .await
        .unwrap();

    let backdated = reviews
        .update(CUSTOMER_ID, APARTMENT_ID, day(3, 8), 9, "rethought it")
        .await;
    assert!(matches!(backdated, Err(EngineError::InvalidArgument(_))));

    reviews
        .update(CUSTOMER_ID, APARTMENT_ID, day(3, 15), 9, "rethought it")
        .await
        .unwrap();

    let stored = store.reviews_for_apartment(APARTMENT_ID).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].rating, 9);
    assert_eq!(stored[0].review_date, day(3, 15));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL running
async fn racing_updates_never_move_the_review_date_backward() {
    let (store, reservations, reviews) = setup().await;

    reservations
        .book(CUSTOMER_ID, APARTMENT_ID, day(5, 1), day(5, 4), 300.0)
        .await
        .unwrap();
    reviews
        .submit(CUSTOMER_ID, APARTMENT_ID, day(5, 10), 6, "fine")
        .await
        .unwrap();

    // Both updates pass the monotonicity check against the date they read.
    // The row lock taken by the in-transaction fetch serializes them, so
    // whichever lands second re-checks against the other's committed date
    // and the stored date can only end up at the later of the two.
    let later = reviews.clone();
    let earlier = reviews.clone();
    let (later_result, earlier_result) = tokio::join!(
        later.update(CUSTOMER_ID, APARTMENT_ID, day(5, 30), 9, "much better"),
        earlier.update(CUSTOMER_ID, APARTMENT_ID, day(5, 12), 4, "second thoughts"),
    );

    // day(5, 30) beats both day(5, 10) and day(5, 12), so it always lands.
    later_result.unwrap();
    if let Err(err) = earlier_result {
        assert!(matches!(err, EngineError::InvalidArgument(_)));
    }

    let stored = store.reviews_for_apartment(APARTMENT_ID).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].review_date, day(5, 30));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL running
async fn updating_a_missing_review_is_not_found() {
    let (_store, _reservations, reviews) = setup().await;

    let result = reviews
        .update(CUSTOMER_ID, APARTMENT_ID, day(4, 1), 5, "ghost")
        .await;
    assert!(matches!(result, Err(EngineError::NotFound)));
}
