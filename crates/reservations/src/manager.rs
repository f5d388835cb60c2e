use chrono::NaiveDate;
use core_types::{EngineError, Reservation};
use database::Store;

/// Inclusive-endpoint overlap test for two date ranges.
///
/// `[s1, e1]` and `[s2, e2]` overlap iff `s1 <= e2 && s2 <= e1`. Both
/// endpoints count as occupied: a stay ending on the 5th collides with a
/// stay starting on the 5th.
pub fn ranges_overlap(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 <= e2 && s2 <= e1
}

/// Creates and cancels bookings while upholding the per-apartment
/// no-overlap invariant.
#[derive(Debug, Clone)]
pub struct ReservationManager {
    store: Store,
}

impl ReservationManager {
    /// Creates a new `ReservationManager` over a shared Store handle.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Books a stay for a customer.
    ///
    /// The overlap check and the insert are indivisible with respect to
    /// other bookings for the same apartment: both run inside a single
    /// transaction that first takes the apartment's exclusive lock. A
    /// racing booking either waits for this transaction to finish and then
    /// re-observes the committed row, or commits first and makes this one
    /// fail. Never both.
    pub async fn book(
        &self,
        customer_id: i32,
        apartment_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_price: f64,
    ) -> Result<(), EngineError> {
        // 1. Fail fast on malformed input, before any Store round trip.
        validate_booking(customer_id, apartment_id, start_date, end_date, total_price)?;

        // 2. Open the transaction and serialize against concurrent bookings
        //    for this apartment.
        let mut tx = self.store.begin().await?;
        tx.lock_apartment(apartment_id).await?;

        // 3. With the lock held, the stored reservation set for the
        //    apartment is stable; apply the overlap predicate to it.
        let existing = tx.reservations_for_apartment(apartment_id).await?;
        if let Some(clash) = existing
            .iter()
            .find(|r| ranges_overlap(start_date, end_date, r.start_date, r.end_date))
        {
            tracing::warn!(
                apartment_id,
                requested_start = %start_date,
                requested_end = %end_date,
                clash_start = %clash.start_date,
                clash_end = %clash.end_date,
                "Booking rejected: requested interval overlaps a stored reservation."
            );
            // The transaction drops here, rolling back with no change made.
            return Err(EngineError::Conflict(format!(
                "apartment {apartment_id} is already reserved from {} to {}",
                clash.start_date, clash.end_date
            )));
        }

        // 4. No overlap: insert and commit as one unit.
        let reservation = Reservation {
            customer_id,
            apartment_id,
            start_date,
            end_date,
            total_price,
        };
        tx.insert_reservation(&reservation).await?;
        tx.commit().await?;

        tracing::debug!(
            customer_id,
            apartment_id,
            start = %start_date,
            end = %end_date,
            "Reservation booked."
        );
        Ok(())
    }

    /// Cancels the reservation matching `(apartment_id, start_date)` for the
    /// given customer. Fails with `NotFound` when no such row exists.
    pub async fn cancel(
        &self,
        customer_id: i32,
        apartment_id: i32,
        start_date: NaiveDate,
    ) -> Result<(), EngineError> {
        if customer_id <= 0 || apartment_id <= 0 {
            return Err(EngineError::InvalidArgument(
                "customer_id and apartment_id must be positive".to_string(),
            ));
        }

        let mut tx = self.store.begin().await?;
        let removed = tx
            .delete_reservation(customer_id, apartment_id, start_date)
            .await?;
        if removed == 0 {
            return Err(EngineError::NotFound);
        }
        tx.commit().await?;

        tracing::debug!(customer_id, apartment_id, start = %start_date, "Reservation cancelled.");
        Ok(())
    }
}

/// Local precondition checks for `book`, run before touching the Store.
fn validate_booking(
    customer_id: i32,
    apartment_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_price: f64,
) -> Result<(), EngineError> {
    if customer_id <= 0 || apartment_id <= 0 {
        return Err(EngineError::InvalidArgument(
            "customer_id and apartment_id must be positive".to_string(),
        ));
    }
    if total_price <= 0.0 || !total_price.is_finite() {
        return Err(EngineError::InvalidArgument(format!(
            "total_price must be a positive number, got {total_price}"
        )));
    }
    if start_date > end_date {
        return Err(EngineError::InvalidArgument(format!(
            "start_date {start_date} is after end_date {end_date}"
        )));
    }
    Ok(())
}
