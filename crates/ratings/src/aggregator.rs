use core_types::{Apartment, EngineError, Review};
use database::Store;

/// Mean rating over a set of reviews; `0.0` when there are none.
pub fn mean_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    total as f64 / reviews.len() as f64
}

/// The two-level averaging rule for owner ratings.
///
/// First each of the owner's apartments gets its own mean rating, with
/// `0.0` for apartments nobody has reviewed; then those per-apartment means
/// are averaged. An unreviewed apartment therefore drags the owner's score
/// down, which a flat average over all individual reviews would not do.
/// Returns `0.0` when the owner has no apartments.
pub fn two_level_average(apartments: &[Apartment], reviews: &[Review]) -> f64 {
    if apartments.is_empty() {
        return 0.0;
    }

    let per_apartment_sum: f64 = apartments
        .iter()
        .map(|apartment| {
            let (count, total) = reviews
                .iter()
                .filter(|r| r.apartment_id == apartment.apartment_id)
                .fold((0i64, 0i64), |(n, sum), r| (n + 1, sum + i64::from(r.rating)));
            if count == 0 { 0.0 } else { total as f64 / count as f64 }
        })
        .sum();

    per_apartment_sum / apartments.len() as f64
}

/// Computes apartment and owner ratings from committed review snapshots.
#[derive(Debug, Clone)]
pub struct RatingAggregator {
    store: Store,
}

impl RatingAggregator {
    /// Creates a new `RatingAggregator` over a shared Store handle.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The mean rating of one apartment; `0.0` when it has no reviews.
    pub async fn apartment_rating(&self, apartment_id: i32) -> Result<f64, EngineError> {
        if apartment_id <= 0 {
            return Err(EngineError::InvalidArgument(
                "apartment_id must be positive".to_string(),
            ));
        }
        let reviews = self.store.reviews_for_apartment(apartment_id).await?;
        Ok(mean_rating(&reviews))
    }

    /// The owner's two-level rating; `0.0` when they own no apartments.
    pub async fn owner_rating(&self, owner_id: i32) -> Result<f64, EngineError> {
        if owner_id <= 0 {
            return Err(EngineError::InvalidArgument(
                "owner_id must be positive".to_string(),
            ));
        }
        let apartments = self.store.apartments_of_owner(owner_id).await?;
        let reviews = self.store.reviews_for_owner(owner_id).await?;
        let rating = two_level_average(&apartments, &reviews);
        tracing::debug!(
            owner_id,
            apartments = apartments.len(),
            reviews = reviews.len(),
            rating,
            "Computed owner rating."
        );
        Ok(rating)
    }
}
