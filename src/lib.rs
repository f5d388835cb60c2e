//! # Stayhub
//!
//! A short-term apartment rental marketplace engine: bookings, reviews, and
//! the analytics derived from them. The hard guarantees (no double-booked
//! apartment, no premature or duplicate review) are enforced by the
//! manager crates; the derived numbers (ratings, value-for-money, monthly
//! profit, peer recommendations) are computed by read-only engines over
//! committed snapshots.
//!
//! The [`Marketplace`] facade wires every component onto one shared Store
//! handle and exposes a synchronous (async-await) method per operation. All
//! operations resolve to the [`core_types::EngineError`] taxonomy; no
//! storage-specific errors leak through.
//!
//! ```no_run
//! use stayhub::Marketplace;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let market = Marketplace::from_env().await?;
//! let profits = market.profit_per_month(2024).await?;
//! assert_eq!(profits.len(), 12);
//! # Ok(())
//! # }
//! ```

use analytics::AnalyticsEngine;
use chrono::NaiveDate;
use core_types::{Apartment, Customer, EngineError, MonthlyProfit, Owner};
use database::{Store, connect};
use ratings::RatingAggregator;
use recommender::RecommendationEngine;
use reservations::ReservationManager;
use reviews::ReviewManager;

/// The engine's call surface: one method per operation, one shared Store.
#[derive(Debug, Clone)]
pub struct Marketplace {
    store: Store,
    reservations: ReservationManager,
    reviews: ReviewManager,
    ratings: RatingAggregator,
    analytics: AnalyticsEngine,
    recommender: RecommendationEngine,
}

impl Marketplace {
    /// Builds a `Marketplace` over an existing Store handle.
    pub fn new(store: Store) -> Self {
        Self {
            reservations: ReservationManager::new(store.clone()),
            reviews: ReviewManager::new(store.clone()),
            ratings: RatingAggregator::new(store.clone()),
            analytics: AnalyticsEngine::new(store.clone()),
            recommender: RecommendationEngine::new(store.clone()),
            store,
        }
    }

    /// Connects via `DATABASE_URL` (loading `.env` if present) and builds
    /// the facade. Schema provisioning is left to the deployment; see
    /// `database::run_migrations`.
    pub async fn from_env() -> Result<Self, EngineError> {
        let pool = connect().await?;
        Ok(Self::new(Store::new(pool)))
    }

    /// The underlying Store, for entity CRUD and direct snapshot reads.
    pub fn store(&self) -> &Store {
        &self.store
    }

    // ------------------------------------------------------------------
    // Reservations
    // ------------------------------------------------------------------

    /// Books a stay; `Conflict` when the interval overlaps a stored one.
    pub async fn book(
        &self,
        customer_id: i32,
        apartment_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_price: f64,
    ) -> Result<(), EngineError> {
        self.reservations
            .book(customer_id, apartment_id, start_date, end_date, total_price)
            .await
    }

    /// Cancels the exact reservation; `NotFound` when nothing matches.
    pub async fn cancel(
        &self,
        customer_id: i32,
        apartment_id: i32,
        start_date: NaiveDate,
    ) -> Result<(), EngineError> {
        self.reservations
            .cancel(customer_id, apartment_id, start_date)
            .await
    }

    // ------------------------------------------------------------------
    // Reviews
    // ------------------------------------------------------------------

    /// Submits a first review; `NotEligible` before the stay completes,
    /// `Conflict` on a duplicate.
    pub async fn submit_review(
        &self,
        customer_id: i32,
        apartment_id: i32,
        review_date: NaiveDate,
        rating: i32,
        review_text: &str,
    ) -> Result<(), EngineError> {
        self.reviews
            .submit(customer_id, apartment_id, review_date, rating, review_text)
            .await
    }

    /// Updates an existing review in place; the review date only moves
    /// forward.
    pub async fn update_review(
        &self,
        customer_id: i32,
        apartment_id: i32,
        new_date: NaiveDate,
        new_rating: i32,
        new_text: &str,
    ) -> Result<(), EngineError> {
        self.reviews
            .update(customer_id, apartment_id, new_date, new_rating, new_text)
            .await
    }

    // ------------------------------------------------------------------
    // Ratings
    // ------------------------------------------------------------------

    /// Mean rating of an apartment; `0.0` without reviews.
    pub async fn apartment_rating(&self, apartment_id: i32) -> Result<f64, EngineError> {
        self.ratings.apartment_rating(apartment_id).await
    }

    /// Two-level owner rating; unreviewed apartments count as `0.0`.
    pub async fn owner_rating(&self, owner_id: i32) -> Result<f64, EngineError> {
        self.ratings.owner_rating(owner_id).await
    }

    // ------------------------------------------------------------------
    // Analytics
    // ------------------------------------------------------------------

    /// Mean price per night of an apartment; `0.0` without reservations.
    pub async fn price_per_night(&self, apartment_id: i32) -> Result<f64, EngineError> {
        self.analytics.price_per_night(apartment_id).await
    }

    /// The apartment with the best rating-to-price ratio.
    pub async fn best_value_for_money(&self) -> Result<Option<Apartment>, EngineError> {
        self.analytics.best_value_for_money().await
    }

    /// The 12-entry profit series for `year`.
    pub async fn profit_per_month(&self, year: i32) -> Result<Vec<MonthlyProfit>, EngineError> {
        self.analytics.profit_per_month(year).await
    }

    /// Reservation volume per owner.
    pub async fn reservation_count_per_owner(&self) -> Result<Vec<(String, i64)>, EngineError> {
        self.analytics.reservation_count_per_owner().await
    }

    /// The most frequently booking customer.
    pub async fn top_customer(&self) -> Result<Option<Customer>, EngineError> {
        self.analytics.top_customer().await
    }

    /// Owners with an apartment in every marketplace location.
    pub async fn owners_in_all_cities(&self) -> Result<Vec<Owner>, EngineError> {
        self.analytics.owners_in_all_cities().await
    }

    // ------------------------------------------------------------------
    // Recommendations
    // ------------------------------------------------------------------

    /// Predicted scores for apartments the customer never reviewed.
    pub async fn recommend(&self, customer_id: i32) -> Result<Vec<(Apartment, f64)>, EngineError> {
        self.recommender.recommend(customer_id).await
    }
}
