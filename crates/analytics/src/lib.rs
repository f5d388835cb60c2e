//! # Stayhub Analytics Crate
//!
//! This crate derives business metrics from committed reservations and
//! reviews: nightly prices, value-for-money ranking, the yearly profit
//! series, and the ownership/customer reports. It is a read-only consumer
//! of the Store and acts as the "unbiased accountant" of the system.
//!
//! ## Architectural Principles
//!
//! - **Pure Calculators:** Every metric is a plain function over row
//!   slices; the `AnalyticsEngine` only fetches snapshots and delegates.
//!   Zero-filler rules (12 months, always) and tie-breaks live in testable
//!   code, not in SQL.
//! - **Stale-Tolerant:** Metrics are computed over whatever snapshot a
//!   single query returns; they never lock anything.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: owns a Store handle; `price_per_night`,
//!   `best_value_for_money`, `profit_per_month`, and the ownership reports.
//! - The pure calculators (`mean_price_per_night`, `monthly_profit_series`,
//!   `best_value_apartment_id`, ...) for direct use in tests.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod reports;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{
    AnalyticsEngine, best_value_apartment_id, mean_price_per_night, monthly_profit_series,
};
pub use reports::{count_reservations_per_owner, owners_covering_locations, top_customer_of};
