//! End-to-end marketplace scenario against a live PostgreSQL instance.
//!
//! Marked `#[ignore]` by default: needs a running database with
//! `DATABASE_URL` set. Run with:
//! `cargo test --test marketplace_flow -- --ignored`

use chrono::NaiveDate;
use core_types::{Apartment, Customer, Owner};
use database::{Store, connect, run_migrations};
use stayhub::Marketplace;

const OWNER_A: i32 = 930;
const OWNER_B: i32 = 931;
const CUSTOMER_A: i32 = 932;
const CUSTOMER_B: i32 = 933;
const APT_RATED: i32 = 934;
const APT_EMPTY: i32 = 935;

fn day(month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, d).unwrap()
}

async fn setup() -> Marketplace {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let pool = connect().await.expect("DATABASE_URL must point at a running PostgreSQL");
    run_migrations(&pool).await.expect("migrations failed");
    let store = Store::new(pool);

    for apartment_id in [APT_RATED, APT_EMPTY] {
        store.delete_apartment(apartment_id).await.unwrap();
    }
    for customer_id in [CUSTOMER_A, CUSTOMER_B] {
        store.delete_customer(customer_id).await.unwrap();
    }
    for owner_id in [OWNER_A, OWNER_B] {
        store.delete_owner(owner_id).await.unwrap();
    }

    for (owner_id, name) in [(OWNER_A, "Frida"), (OWNER_B, "Gus")] {
        store
            .add_owner(&Owner { owner_id, name: name.to_string() })
            .await
            .unwrap();
    }
    for (customer_id, name) in [(CUSTOMER_A, "Hana"), (CUSTOMER_B, "Ivo")] {
        store
            .add_customer(&Customer { customer_id, name: name.to_string() })
            .await
            .unwrap();
    }
    for (apartment_id, address) in [(APT_RATED, "1 River Walk"), (APT_EMPTY, "2 River Walk")] {
        store
            .add_apartment(&Apartment {
                apartment_id,
                address: address.to_string(),
                city: "Valencia".to_string(),
                country: "Spain".to_string(),
                size: 55,
            })
            .await
            .unwrap();
    }
    store.assign_owner(OWNER_A, APT_RATED).await.unwrap();
    store.assign_owner(OWNER_A, APT_EMPTY).await.unwrap();

    Marketplace::new(store)
}

#[tokio::test]
#[ignore] // Requires PostgreSQL running
async fn ratings_profit_and_recommendations_end_to_end() {
    let market = setup().await;

    // Two completed stays at the rated apartment; March and August 2024.
    market
        .book(CUSTOMER_A, APT_RATED, day(2, 27), day(3, 2), 1000.0)
        .await
        .unwrap();
    market
        .book(CUSTOMER_B, APT_RATED, day(8, 10), day(8, 12), 600.0)
        .await
        .unwrap();

    // Both guests review top marks after checkout.
    market
        .submit_review(CUSTOMER_A, APT_RATED, day(3, 5), 10, "great stay")
        .await
        .unwrap();
    market
        .submit_review(CUSTOMER_B, APT_RATED, day(8, 15), 10, "spotless")
        .await
        .unwrap();

    // Apartment rating is the flat mean of its reviews.
    let apartment_rating = market.apartment_rating(APT_RATED).await.unwrap();
    assert!((apartment_rating - 10.0).abs() < 1e-9);

    // Two-level owner rating: avg(10, 0) = 5. The unreviewed apartment
    // drags the owner down, unlike a flat review-level average.
    let owner_rating = market.owner_rating(OWNER_A).await.unwrap();
    assert!((owner_rating - 5.0).abs() < 1e-9);

    // Owner B owns nothing and rates 0.
    assert_eq!(market.owner_rating(OWNER_B).await.unwrap(), 0.0);

    // Profit series: 12 entries, March and August carry 15% of the take.
    let series = market.profit_per_month(2024).await.unwrap();
    assert_eq!(series.len(), 12);
    assert!((series[2].profit - 150.0).abs() < 1e-9);
    assert!((series[7].profit - 90.0).abs() < 1e-9);
    assert_eq!(
        series.iter().filter(|e| e.profit == 0.0).count(),
        10,
        "all other months are zero-filled"
    );

    // The rated apartment is the only one with reservations, so it is the
    // best value by default.
    let best = market.best_value_for_money().await.unwrap().unwrap();
    assert_eq!(best.apartment_id, APT_RATED);

    // Both customers reviewed everything that has reviews, so neither gets
    // a recommendation out of this snapshot.
    assert!(market.recommend(CUSTOMER_A).await.unwrap().is_empty());
}
