use chrono::{Datelike, NaiveDate};
use core_types::{Apartment, EngineError, MonthlyProfit, Reservation, Review};
use database::Store;
use std::collections::HashMap;

/// The marketplace's cut of every reservation, applied when computing profit.
const COMMISSION_RATE: f64 = 0.15;

/// Mean price per night across a set of reservations; `0.0` when empty.
///
/// Nights are counted inclusive of both endpoints, so a one-day stay is one
/// night and the division is always by at least 1.
pub fn mean_price_per_night(reservations: &[Reservation]) -> f64 {
    if reservations.is_empty() {
        return 0.0;
    }
    let total: f64 = reservations
        .iter()
        .map(|r| r.total_price / r.nights() as f64)
        .sum();
    total / reservations.len() as f64
}

/// Picks the apartment with the best value score: mean rating divided by
/// mean price per night.
///
/// Only apartments with at least one reservation compete. Without a
/// reservation there is no price per night, and excluding them avoids the
/// zero division rather than guessing a fallback. Ties go to the lowest
/// apartment id. Returns `None` when no apartment qualifies.
pub fn best_value_apartment_id(reservations: &[Reservation], reviews: &[Review]) -> Option<i32> {
    let mut by_apartment: HashMap<i32, Vec<&Reservation>> = HashMap::new();
    for r in reservations {
        by_apartment.entry(r.apartment_id).or_default().push(r);
    }

    let mut best: Option<(i32, f64)> = None;
    let mut candidates: Vec<i32> = by_apartment.keys().copied().collect();
    candidates.sort_unstable();

    for apartment_id in candidates {
        let stays = &by_apartment[&apartment_id];
        let nightly_sum: f64 = stays.iter().map(|r| r.total_price / r.nights() as f64).sum();
        let price_per_night = nightly_sum / stays.len() as f64;
        if price_per_night <= 0.0 {
            continue;
        }
        let (review_count, rating_sum) = reviews
            .iter()
            .filter(|rv| rv.apartment_id == apartment_id)
            .fold((0i64, 0i64), |(n, sum), rv| (n + 1, sum + i64::from(rv.rating)));
        let rating = if review_count == 0 {
            0.0
        } else {
            rating_sum as f64 / review_count as f64
        };
        let score = rating / price_per_night;
        if score < 0.0 {
            continue;
        }
        // Strictly-greater keeps the lowest id on ties, since ids ascend.
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((apartment_id, score)),
        }
    }

    best.map(|(apartment_id, _)| apartment_id)
}

/// Builds the 12-entry profit series for one year.
///
/// A reservation contributes `COMMISSION_RATE * total_price` to the month
/// its `end_date` falls in. Months without qualifying reservations still
/// appear, carrying `0.0`; the series is always exactly 12 entries,
/// ordered by month ascending.
pub fn monthly_profit_series(year: i32, reservations: &[Reservation]) -> Vec<MonthlyProfit> {
    let mut sums = [0.0f64; 12];
    for r in reservations {
        if r.end_date.year() == year {
            sums[r.end_date.month0() as usize] += r.total_price;
        }
    }
    sums.iter()
        .enumerate()
        .map(|(idx, sum)| MonthlyProfit {
            month: idx as u32 + 1,
            profit: COMMISSION_RATE * sum,
        })
        .collect()
}

/// Computes pricing, value and profit metrics from committed snapshots.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    pub(crate) store: Store,
}

impl AnalyticsEngine {
    /// Creates a new `AnalyticsEngine` over a shared Store handle.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Mean price per night of one apartment; `0.0` when it has never been
    /// reserved.
    pub async fn price_per_night(&self, apartment_id: i32) -> Result<f64, EngineError> {
        if apartment_id <= 0 {
            return Err(EngineError::InvalidArgument(
                "apartment_id must be positive".to_string(),
            ));
        }
        let reservations = self.store.reservations_for_apartment(apartment_id).await?;
        Ok(mean_price_per_night(&reservations))
    }

    /// The apartment with the highest rating-to-price ratio, or `None` when
    /// no apartment has been reserved yet.
    pub async fn best_value_for_money(&self) -> Result<Option<Apartment>, EngineError> {
        let reservations = self.store.all_reservations().await?;
        let reviews = self.store.all_reviews().await?;

        let Some(apartment_id) = best_value_apartment_id(&reservations, &reviews) else {
            tracing::debug!("No apartment qualifies for best value yet.");
            return Ok(None);
        };
        tracing::debug!(apartment_id, "Selected best value apartment.");
        // The winner can only vanish if it was deleted between the two
        // snapshot reads; serve the stale answer as "nothing qualifies".
        Ok(self.store.apartment(apartment_id).await?)
    }

    /// The profit series for `year`: exactly 12 entries, months 1..=12.
    pub async fn profit_per_month(&self, year: i32) -> Result<Vec<MonthlyProfit>, EngineError> {
        let (from, until) = year_bounds(year)?;
        let reservations = self.store.reservations_ending_between(from, until).await?;
        Ok(monthly_profit_series(year, &reservations))
    }
}

/// First and last day of `year`, rejecting years chrono cannot represent.
fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), EngineError> {
    let from = NaiveDate::from_ymd_opt(year, 1, 1);
    let until = NaiveDate::from_ymd_opt(year, 12, 31);
    match (from, until) {
        (Some(from), Some(until)) => Ok((from, until)),
        _ => Err(EngineError::InvalidArgument(format!(
            "year {year} is out of range"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stay(apartment_id: i32, start: (i32, u32, u32), end: (i32, u32, u32), price: f64) -> Reservation {
        Reservation {
            customer_id: 1,
            apartment_id,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            total_price: price,
        }
    }

    fn review(apartment_id: i32, rating: i32) -> Review {
        Review {
            customer_id: 1,
            apartment_id,
            review_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            rating,
            review_text: String::new(),
        }
    }

    #[test]
    fn price_per_night_counts_both_endpoints() {
        // 2024-06-01 to 2024-06-03 is three nights inclusive.
        let stays = [stay(1, (2024, 6, 1), (2024, 6, 3), 300.0)];
        assert!((mean_price_per_night(&stays) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn price_per_night_averages_across_stays() {
        let stays = [
            stay(1, (2024, 6, 1), (2024, 6, 1), 80.0),  // 80 per night
            stay(1, (2024, 7, 1), (2024, 7, 4), 480.0), // 120 per night
        ];
        assert!((mean_price_per_night(&stays) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn price_per_night_of_unreserved_apartment_is_zero() {
        assert_eq!(mean_price_per_night(&[]), 0.0);
    }

    #[test]
    fn best_value_excludes_apartments_without_reservations() {
        // Apartment 2 is reviewed spectacularly but never reserved: no
        // price per night exists for it, so apartment 1 wins.
        let reservations = [stay(1, (2024, 6, 1), (2024, 6, 2), 200.0)];
        let reviews = [review(1, 5), review(2, 10)];
        assert_eq!(best_value_apartment_id(&reservations, &reviews), Some(1));
    }

    #[test]
    fn best_value_prefers_higher_rating_per_price() {
        // Both cost 100/night; apartment 2 rates higher.
        let reservations = [
            stay(1, (2024, 6, 1), (2024, 6, 2), 200.0),
            stay(2, (2024, 6, 1), (2024, 6, 2), 200.0),
        ];
        let reviews = [review(1, 4), review(2, 9)];
        assert_eq!(best_value_apartment_id(&reservations, &reviews), Some(2));
    }

    #[test]
    fn best_value_ties_break_to_lowest_id() {
        let reservations = [
            stay(7, (2024, 6, 1), (2024, 6, 2), 200.0),
            stay(3, (2024, 7, 1), (2024, 7, 2), 200.0),
        ];
        let reviews = [review(7, 8), review(3, 8)];
        assert_eq!(best_value_apartment_id(&reservations, &reviews), Some(3));
    }

    #[test]
    fn best_value_with_no_reservations_is_none() {
        assert_eq!(best_value_apartment_id(&[], &[review(1, 10)]), None);
    }

    #[test]
    fn reviewless_apartment_can_still_win_with_zero_score() {
        // One reserved apartment, zero reviews: score 0 is non-negative and
        // the apartment is the only candidate.
        let reservations = [stay(4, (2024, 6, 1), (2024, 6, 2), 200.0)];
        assert_eq!(best_value_apartment_id(&reservations, &[]), Some(4));
    }

    #[test]
    fn profit_series_always_has_twelve_months() {
        // Reservations only in March and August of 2024.
        let reservations = [
            stay(1, (2024, 2, 27), (2024, 3, 2), 1000.0),
            stay(1, (2024, 8, 10), (2024, 8, 12), 400.0),
            stay(2, (2024, 8, 20), (2024, 8, 22), 600.0),
        ];
        let series = monthly_profit_series(2024, &reservations);

        assert_eq!(series.len(), 12);
        for (idx, entry) in series.iter().enumerate() {
            assert_eq!(entry.month, idx as u32 + 1);
        }
        assert!((series[2].profit - 150.0).abs() < 1e-9); // March: 0.15 * 1000
        assert!((series[7].profit - 150.0).abs() < 1e-9); // August: 0.15 * 1000
        for entry in series.iter().filter(|e| e.month != 3 && e.month != 8) {
            assert_eq!(entry.profit, 0.0);
        }
    }

    #[test]
    fn profit_buckets_by_end_date_year() {
        // Ends in January 2025, so contributes nothing to 2024.
        let reservations = [stay(1, (2024, 12, 28), (2025, 1, 2), 500.0)];
        let series = monthly_profit_series(2024, &reservations);
        assert!(series.iter().all(|e| e.profit == 0.0));

        let next_year = monthly_profit_series(2025, &reservations);
        assert!((next_year[0].profit - 75.0).abs() < 1e-9);
    }

    #[test]
    fn year_bounds_rejects_unrepresentable_years() {
        assert!(year_bounds(2024).is_ok());
        assert!(year_bounds(i32::MAX).is_err());
    }
}
