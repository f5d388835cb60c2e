use core_types::{Apartment, EngineError, Review};
use database::Store;
use std::collections::{HashMap, HashSet};

/// Per-peer taste ratios relative to `customer_id`.
///
/// For every reviewer who shares at least one rated apartment with the
/// customer, the ratio `peer_rating / customer_rating` is averaged over the
/// shared apartments. A ratio above 1 means the peer rates more generously
/// than the customer. Shared apartments where the customer's stored rating
/// is zero are skipped: the division is undefined, so the row contributes
/// nothing rather than crashing.
pub fn taste_ratios(reviews: &[Review], customer_id: i32) -> HashMap<i32, f64> {
    let own_ratings: HashMap<i32, i32> = reviews
        .iter()
        .filter(|r| r.customer_id == customer_id)
        .map(|r| (r.apartment_id, r.rating))
        .collect();

    let mut ratio_sums: HashMap<i32, (f64, u32)> = HashMap::new();
    for r in reviews.iter().filter(|r| r.customer_id != customer_id) {
        let Some(&own) = own_ratings.get(&r.apartment_id) else {
            continue;
        };
        if own == 0 {
            continue;
        }
        let entry = ratio_sums.entry(r.customer_id).or_insert((0.0, 0));
        entry.0 += f64::from(r.rating) / f64::from(own);
        entry.1 += 1;
    }

    ratio_sums
        .into_iter()
        .map(|(peer_id, (sum, n))| (peer_id, sum / f64::from(n)))
        .collect()
}

/// Predicted `(apartment_id, score)` pairs for apartments the customer has
/// not reviewed, ordered by apartment id.
///
/// Each peer with a taste ratio who reviewed a candidate apartment
/// contributes their rating scaled by their ratio, clamped into `[1, 10]`;
/// the prediction is the mean of the contributions. Clamping applies per
/// contribution, before averaging, so a wildly generous peer saturates at 10
/// instead of dragging the mean past the rating scale. Apartments with no
/// contributing peer are omitted.
pub fn predict_scores(reviews: &[Review], customer_id: i32) -> Vec<(i32, f64)> {
    let ratios = taste_ratios(reviews, customer_id);
    let reviewed: HashSet<i32> = reviews
        .iter()
        .filter(|r| r.customer_id == customer_id)
        .map(|r| r.apartment_id)
        .collect();

    let mut contributions: HashMap<i32, (f64, u32)> = HashMap::new();
    for r in reviews {
        if r.customer_id == customer_id || reviewed.contains(&r.apartment_id) {
            continue;
        }
        let Some(&ratio) = ratios.get(&r.customer_id) else {
            continue;
        };
        let scaled = (f64::from(r.rating) * ratio).clamp(1.0, 10.0);
        let entry = contributions.entry(r.apartment_id).or_insert((0.0, 0));
        entry.0 += scaled;
        entry.1 += 1;
    }

    let mut predictions: Vec<(i32, f64)> = contributions
        .into_iter()
        .map(|(apartment_id, (sum, n))| (apartment_id, sum / f64::from(n)))
        .collect();
    predictions.sort_unstable_by_key(|&(apartment_id, _)| apartment_id);
    predictions
}

/// Predicts ratings for unreviewed apartments from peer review snapshots.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    store: Store,
}

impl RecommendationEngine {
    /// Creates a new `RecommendationEngine` over a shared Store handle.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Apartments the customer might like, with predicted scores.
    pub async fn recommend(&self, customer_id: i32) -> Result<Vec<(Apartment, f64)>, EngineError> {
        if customer_id <= 0 {
            return Err(EngineError::InvalidArgument(
                "customer_id must be positive".to_string(),
            ));
        }

        let reviews = self.store.all_reviews().await?;
        let scores = predict_scores(&reviews, customer_id);
        tracing::debug!(customer_id, candidates = scores.len(), "Computed recommendations.");
        if scores.is_empty() {
            return Ok(Vec::new());
        }

        let apartments: HashMap<i32, Apartment> = self
            .store
            .all_apartments()
            .await?
            .into_iter()
            .map(|a| (a.apartment_id, a))
            .collect();

        // Reviews of apartments deleted between the two snapshot reads
        // simply drop out of the result.
        Ok(scores
            .into_iter()
            .filter_map(|(apartment_id, score)| {
                apartments.get(&apartment_id).map(|a| (a.clone(), score))
            })
            .collect())
    }
}
