use crate::error::StoreError;
use chrono::NaiveDate;
use core_types::{Apartment, Customer, Owner, Reservation, Review};
use sqlx::Transaction;
use sqlx::postgres::{PgPool, Postgres};

/// Lock namespace for per-apartment advisory locks taken while booking.
const APARTMENT_LOCK_CLASS: i32 = 1;

/// The `Store` provides a high-level, application-specific interface to the
/// marketplace database. It encapsulates all SQL queries and data access
/// logic: mechanical entity CRUD, plus the snapshot reads the read-only
/// engines aggregate over.
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Creates a new `Store` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a transaction for a guarded check-then-mutate sequence.
    pub async fn begin(&self) -> Result<StoreTx<'static>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(StoreTx { tx })
    }

    // ------------------------------------------------------------------
    // Entity CRUD
    // ------------------------------------------------------------------

    pub async fn add_owner(&self, owner: &Owner) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO owners (owner_id, name) VALUES ($1, $2)")
            .bind(owner.owner_id)
            .bind(&owner.name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn owner(&self, owner_id: i32) -> Result<Option<Owner>, StoreError> {
        let owner = sqlx::query_as::<_, Owner>("SELECT owner_id, name FROM owners WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(owner)
    }

    /// Deletes an owner. Ownership links cascade away; the apartments stay.
    pub async fn delete_owner(&self, owner_id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM owners WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn add_customer(&self, customer: &Customer) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO customers (customer_id, name) VALUES ($1, $2)")
            .bind(customer.customer_id)
            .bind(&customer.name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn customer(&self, customer_id: i32) -> Result<Option<Customer>, StoreError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT customer_id, name FROM customers WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn delete_customer(&self, customer_id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn add_apartment(&self, apartment: &Apartment) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO apartments (apartment_id, address, city, country, size) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(apartment.apartment_id)
        .bind(&apartment.address)
        .bind(&apartment.city)
        .bind(&apartment.country)
        .bind(apartment.size)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn apartment(&self, apartment_id: i32) -> Result<Option<Apartment>, StoreError> {
        let apartment = sqlx::query_as::<_, Apartment>(
            "SELECT apartment_id, address, city, country, size \
             FROM apartments WHERE apartment_id = $1",
        )
        .bind(apartment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(apartment)
    }

    pub async fn delete_apartment(&self, apartment_id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM apartments WHERE apartment_id = $1")
            .bind(apartment_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Records that `owner_id` owns `apartment_id`. The `owned_by` table is
    /// keyed by apartment, so an apartment can never gain a second owner.
    pub async fn assign_owner(&self, owner_id: i32, apartment_id: i32) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO owned_by (apartment_id, owner_id) VALUES ($1, $2)")
            .bind(apartment_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn unassign_owner(&self, owner_id: i32, apartment_id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM owned_by WHERE apartment_id = $1 AND owner_id = $2")
            .bind(apartment_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn owner_of_apartment(&self, apartment_id: i32) -> Result<Option<Owner>, StoreError> {
        let owner = sqlx::query_as::<_, Owner>(
            "SELECT o.owner_id, o.name FROM owners AS o \
             JOIN owned_by AS ob ON o.owner_id = ob.owner_id \
             WHERE ob.apartment_id = $1",
        )
        .bind(apartment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(owner)
    }

    pub async fn apartments_of_owner(&self, owner_id: i32) -> Result<Vec<Apartment>, StoreError> {
        let apartments = sqlx::query_as::<_, Apartment>(
            "SELECT a.apartment_id, a.address, a.city, a.country, a.size \
             FROM apartments AS a \
             JOIN owned_by AS ob ON a.apartment_id = ob.apartment_id \
             WHERE ob.owner_id = $1 \
             ORDER BY a.apartment_id ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(apartments)
    }

    // ------------------------------------------------------------------
    // Snapshot reads for the read-only engines
    // ------------------------------------------------------------------

    pub async fn reservations_for_apartment(
        &self,
        apartment_id: i32,
    ) -> Result<Vec<Reservation>, StoreError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT customer_id, apartment_id, start_date, end_date, total_price \
             FROM reservations WHERE apartment_id = $1 \
             ORDER BY start_date ASC",
        )
        .bind(apartment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    pub async fn all_reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT customer_id, apartment_id, start_date, end_date, total_price \
             FROM reservations ORDER BY apartment_id ASC, start_date ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    /// Reservations whose stay ends in the inclusive `[from, until]` window.
    pub async fn reservations_ending_between(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<Reservation>, StoreError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT customer_id, apartment_id, start_date, end_date, total_price \
             FROM reservations WHERE end_date >= $1 AND end_date <= $2 \
             ORDER BY end_date ASC",
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    pub async fn reviews_for_apartment(&self, apartment_id: i32) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT customer_id, apartment_id, review_date, rating, review_text \
             FROM reviews WHERE apartment_id = $1 \
             ORDER BY customer_id ASC",
        )
        .bind(apartment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    /// All reviews of apartments owned by `owner_id`, in one round trip.
    pub async fn reviews_for_owner(&self, owner_id: i32) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT r.customer_id, r.apartment_id, r.review_date, r.rating, r.review_text \
             FROM reviews AS r \
             JOIN owned_by AS ob ON r.apartment_id = ob.apartment_id \
             WHERE ob.owner_id = $1 \
             ORDER BY r.apartment_id ASC, r.customer_id ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    pub async fn all_reviews(&self) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT customer_id, apartment_id, review_date, rating, review_text \
             FROM reviews ORDER BY apartment_id ASC, customer_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    pub async fn all_apartments(&self) -> Result<Vec<Apartment>, StoreError> {
        let apartments = sqlx::query_as::<_, Apartment>(
            "SELECT apartment_id, address, city, country, size \
             FROM apartments ORDER BY apartment_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(apartments)
    }

    pub async fn all_owners(&self) -> Result<Vec<Owner>, StoreError> {
        let owners =
            sqlx::query_as::<_, Owner>("SELECT owner_id, name FROM owners ORDER BY owner_id ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(owners)
    }

    pub async fn all_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT customer_id, name FROM customers ORDER BY customer_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    /// Every `(owner_id, apartment_id)` ownership link.
    pub async fn ownership_pairs(&self) -> Result<Vec<(i32, i32)>, StoreError> {
        let pairs = sqlx::query_as::<_, (i32, i32)>(
            "SELECT owner_id, apartment_id FROM owned_by ORDER BY owner_id ASC, apartment_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(pairs)
    }
}

/// A single open transaction against the Store.
///
/// The managers drive their check-then-mutate sequences through this type so
/// the read and the write commit (or roll back) as one unit. Dropping a
/// `StoreTx` without calling [`commit`](StoreTx::commit) rolls it back,
/// leaving no partial state behind.
pub struct StoreTx<'a> {
    tx: Transaction<'a, Postgres>,
}

impl StoreTx<'_> {
    /// Takes the transaction-scoped exclusive lock for one apartment.
    ///
    /// Concurrent bookings for the same apartment serialize on this lock, so
    /// an overlap check performed after acquiring it cannot be invalidated by
    /// a racing insert. The lock releases automatically at commit/rollback.
    pub async fn lock_apartment(&mut self, apartment_id: i32) -> Result<(), StoreError> {
        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(APARTMENT_LOCK_CLASS)
            .bind(apartment_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn reservations_for_apartment(
        &mut self,
        apartment_id: i32,
    ) -> Result<Vec<Reservation>, StoreError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT customer_id, apartment_id, start_date, end_date, total_price \
             FROM reservations WHERE apartment_id = $1 \
             ORDER BY start_date ASC",
        )
        .bind(apartment_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(reservations)
    }

    pub async fn reservations_for_pair(
        &mut self,
        customer_id: i32,
        apartment_id: i32,
    ) -> Result<Vec<Reservation>, StoreError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT customer_id, apartment_id, start_date, end_date, total_price \
             FROM reservations WHERE customer_id = $1 AND apartment_id = $2 \
             ORDER BY start_date ASC",
        )
        .bind(customer_id)
        .bind(apartment_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(reservations)
    }

    pub async fn insert_reservation(&mut self, reservation: &Reservation) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO reservations (customer_id, apartment_id, start_date, end_date, total_price) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(reservation.customer_id)
        .bind(reservation.apartment_id)
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .bind(reservation.total_price)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    /// Deletes the reservation matching the cancellation key. Returns the
    /// number of rows removed (0 or 1, given the primary key).
    pub async fn delete_reservation(
        &mut self,
        customer_id: i32,
        apartment_id: i32,
        start_date: NaiveDate,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM reservations \
             WHERE customer_id = $1 AND apartment_id = $2 AND start_date = $3",
        )
        .bind(customer_id)
        .bind(apartment_id)
        .bind(start_date)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Reads one review and takes its row lock for the rest of the
    /// transaction. Concurrent updates of the same review serialize here,
    /// so the date a caller checks against is the date it overwrites.
    pub async fn fetch_review(
        &mut self,
        customer_id: i32,
        apartment_id: i32,
    ) -> Result<Option<Review>, StoreError> {
        let review = sqlx::query_as::<_, Review>(
            "SELECT customer_id, apartment_id, review_date, rating, review_text \
             FROM reviews WHERE customer_id = $1 AND apartment_id = $2 \
             FOR UPDATE",
        )
        .bind(customer_id)
        .bind(apartment_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(review)
    }

    pub async fn insert_review(&mut self, review: &Review) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO reviews (customer_id, apartment_id, review_date, rating, review_text) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(review.customer_id)
        .bind(review.apartment_id)
        .bind(review.review_date)
        .bind(review.rating)
        .bind(&review.review_text)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    /// Replaces rating, text and date of an existing review in place.
    pub async fn update_review(&mut self, review: &Review) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE reviews SET rating = $1, review_text = $2, review_date = $3 \
             WHERE customer_id = $4 AND apartment_id = $5",
        )
        .bind(review.rating)
        .bind(&review.review_text)
        .bind(review.review_date)
        .bind(review.customer_id)
        .bind(review.apartment_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
