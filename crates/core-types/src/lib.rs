pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::EngineError;
pub use structs::{Apartment, Customer, MonthlyProfit, Owner, Reservation, Review};
