//! # Stayhub Ratings Crate
//!
//! This crate turns raw review rows into apartment and owner ratings. It is
//! a pure aggregation layer: it reads committed snapshots from the Store and
//! never writes anything.
//!
//! ## Architectural Principles
//!
//! - **Math in the Engine:** The averaging rules live here as plain
//!   functions over slices, not in opaque database views, so the two-level
//!   rule stays testable in isolation.
//! - **Zero, Never Null:** An apartment without reviews rates `0.0`, and an
//!   owner without apartments rates `0.0`. Absence is a number, not an
//!   error.
//!
//! ## Public API
//!
//! - `RatingAggregator`: owns a Store handle; `apartment_rating` and
//!   `owner_rating`.
//! - `mean_rating` / `two_level_average`: the pure averaging rules.

// Declare the modules that constitute this crate.
pub mod aggregator;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::{RatingAggregator, mean_rating, two_level_average};
