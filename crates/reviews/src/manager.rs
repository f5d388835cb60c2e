use chrono::NaiveDate;
use core_types::{EngineError, Reservation, Review};
use database::Store;

/// Eligibility predicate: has any of the customer's stays at the apartment
/// completed by `review_date`? A stay counts as completed on its end date,
/// so reviewing on checkout day is allowed.
pub fn stay_completed_by(reservations: &[Reservation], review_date: NaiveDate) -> bool {
    reservations.iter().any(|r| r.end_date <= review_date)
}

/// Creates and updates reviews while upholding the one-review-per-pair and
/// completed-stay rules.
#[derive(Debug, Clone)]
pub struct ReviewManager {
    store: Store,
}

impl ReviewManager {
    /// Creates a new `ReviewManager` over a shared Store handle.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Submits a first review for `(customer_id, apartment_id)`.
    ///
    /// Fails with `NotEligible` unless the customer has a reservation for
    /// the apartment that ended on or before `review_date`. A second
    /// submission for the same pair fails with `Conflict`; the table key
    /// serializes racing duplicates, so one of two concurrent submissions
    /// always loses cleanly.
    pub async fn submit(
        &self,
        customer_id: i32,
        apartment_id: i32,
        review_date: NaiveDate,
        rating: i32,
        review_text: &str,
    ) -> Result<(), EngineError> {
        // 1. Fail fast on malformed input, before any Store round trip.
        validate_review_input(customer_id, apartment_id, rating)?;

        // 2. Check eligibility and insert in the same transaction.
        let mut tx = self.store.begin().await?;
        let stays = tx.reservations_for_pair(customer_id, apartment_id).await?;
        if !stay_completed_by(&stays, review_date) {
            tracing::warn!(
                customer_id,
                apartment_id,
                review_date = %review_date,
                "Review rejected: no stay completed by the review date."
            );
            return Err(EngineError::NotEligible);
        }

        let review = Review {
            customer_id,
            apartment_id,
            review_date,
            rating,
            review_text: review_text.to_string(),
        };
        tx.insert_review(&review).await?;
        tx.commit().await?;

        tracing::debug!(customer_id, apartment_id, rating, "Review submitted.");
        Ok(())
    }

    /// Replaces an existing review's rating, text and date in place.
    ///
    /// Fails with `NotFound` when the pair has no review, and with
    /// `InvalidArgument` when `new_date` would move the review's timeline
    /// backward relative to the stored date.
    pub async fn update(
        &self,
        customer_id: i32,
        apartment_id: i32,
        new_date: NaiveDate,
        new_rating: i32,
        new_text: &str,
    ) -> Result<(), EngineError> {
        validate_review_input(customer_id, apartment_id, new_rating)?;

        let mut tx = self.store.begin().await?;
        let stored = tx
            .fetch_review(customer_id, apartment_id)
            .await?
            .ok_or(EngineError::NotFound)?;

        if new_date < stored.review_date {
            return Err(EngineError::InvalidArgument(format!(
                "review_date may not move backward: stored {}, requested {new_date}",
                stored.review_date
            )));
        }

        let review = Review {
            customer_id,
            apartment_id,
            review_date: new_date,
            rating: new_rating,
            review_text: new_text.to_string(),
        };
        let updated = tx.update_review(&review).await?;
        if updated == 0 {
            // The row vanished between fetch and update (concurrent entity
            // delete); report it the same way as a missing review.
            return Err(EngineError::NotFound);
        }
        tx.commit().await?;

        tracing::debug!(customer_id, apartment_id, new_rating, "Review updated.");
        Ok(())
    }
}

/// Local precondition checks shared by `submit` and `update`.
fn validate_review_input(
    customer_id: i32,
    apartment_id: i32,
    rating: i32,
) -> Result<(), EngineError> {
    if customer_id <= 0 || apartment_id <= 0 {
        return Err(EngineError::InvalidArgument(
            "customer_id and apartment_id must be positive".to_string(),
        ));
    }
    if !(1..=10).contains(&rating) {
        return Err(EngineError::InvalidArgument(format!(
            "rating must be in [1, 10], got {rating}"
        )));
    }
    Ok(())
}
