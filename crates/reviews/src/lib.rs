//! # Stayhub Reviews Crate
//!
//! This crate gates who may review what, and when. A review exists only for
//! a completed stay, at most once per `(customer, apartment)` pair, and its
//! date only ever moves forward.
//!
//! ## Architectural Principles
//!
//! - **Eligibility Before Insert:** The completed-stay check and the insert
//!   run in one Store transaction; a racing duplicate submission is caught
//!   by the review table's key and surfaces as `Conflict`, never as a
//!   silent overwrite.
//! - **Pure Rules:** Eligibility and date monotonicity are plain functions
//!   over rows, testable without a database.
//!
//! ## Public API
//!
//! - `ReviewManager`: the struct that owns a Store handle and provides
//!   `submit` and `update`.
//! - `stay_completed_by`: the eligibility predicate.

// Declare the modules that constitute this crate.
pub mod manager;

// Re-export the key components to create a clean, public-facing API.
pub use manager::{ReviewManager, stay_completed_by};
