use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An apartment owner. Identity is the caller-assigned positive `owner_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Owner {
    pub owner_id: i32,
    pub name: String,
}

/// A customer who books stays and writes reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub customer_id: i32,
    pub name: String,
}

/// A rentable apartment. `(city, address)` is unique across the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Apartment {
    pub apartment_id: i32,
    pub address: String,
    pub city: String,
    pub country: String,
    /// Floor area in square meters; always positive.
    pub size: i32,
}

/// A booked stay, keyed by `(apartment_id, start_date, end_date)`.
///
/// Date ranges are inclusive at both endpoints: a reservation from the 1st
/// to the 3rd occupies three nights, and another reservation starting on the
/// 3rd overlaps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub customer_id: i32,
    pub apartment_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: f64,
}

impl Reservation {
    /// The number of nights, counting both endpoints.
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// A customer's review of an apartment, keyed by `(customer_id, apartment_id)`.
///
/// A review may exist only once the customer has completed a stay at the
/// apartment, and its `review_date` never moves backward across updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub customer_id: i32,
    pub apartment_id: i32,
    pub review_date: NaiveDate,
    /// Score in `[1, 10]`.
    pub rating: i32,
    pub review_text: String,
}

/// One entry of the yearly profit series: `month` is `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProfit {
    pub month: u32,
    pub profit: f64,
}
