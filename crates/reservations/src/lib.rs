//! # Stayhub Reservations Crate
//!
//! This crate enforces the marketplace's central correctness property: for
//! any apartment, no two stored reservations ever overlap. It is the
//! "doorman" of the system: every booking passes through it.
//!
//! ## Architectural Principles
//!
//! - **Atomic Check-Then-Insert:** The overlap check and the insert run in
//!   one Store transaction under a per-apartment exclusive lock, so two
//!   racing bookings for the same apartment serialize and exactly one wins.
//! - **Pure Predicate:** The inclusive-endpoint overlap test itself is a
//!   plain function over dates, testable without a database.
//!
//! ## Public API
//!
//! - `ReservationManager`: the struct that owns a Store handle and provides
//!   `book` and `cancel`.
//! - `ranges_overlap`: the inclusive date-range overlap predicate.

// Declare the modules that constitute this crate.
pub mod manager;

// Re-export the key components to create a clean, public-facing API.
pub use manager::{ReservationManager, ranges_overlap};
