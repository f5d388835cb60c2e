//! # Stayhub Recommender Crate
//!
//! This crate predicts how a customer would rate apartments they have never
//! reviewed, from the ratings of similarly-tasted peers. Like the analytics
//! crate it is a read-only consumer of committed review snapshots.
//!
//! ## Architectural Principles
//!
//! - **Pure Heuristic:** The taste-ratio model is plain arithmetic over
//!   review slices; the `RecommendationEngine` only fetches the snapshot
//!   and joins apartment rows onto the result.
//! - **Guarded Division:** A rating of zero in stored data would make the
//!   ratio undefined; such rows are skipped rather than crashing or
//!   poisoning the model.
//!
//! ## Public API
//!
//! - `RecommendationEngine`: owns a Store handle; `recommend`.
//! - `taste_ratios` / `predict_scores`: the pure model, for direct testing.

// Declare the modules that constitute this crate.
pub mod engine;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{RecommendationEngine, predict_scores, taste_ratios};
