use thiserror::Error;

/// The error taxonomy every engine operation resolves to.
///
/// Storage-level failures are translated into these variants before they
/// reach a caller, so no storage-specific vocabulary leaks out of the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed or out-of-range input, caught before any Store round trip.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A uniqueness or overlap rule would be violated by the mutation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The referenced row is absent, or a delete/cancel/update target is missing.
    #[error("The requested row was not found.")]
    NotFound,

    /// A review was submitted before the matching stay completed.
    #[error("Customer is not eligible to review this apartment yet.")]
    NotEligible,

    /// A Store-level failure not attributable to caller input.
    #[error("Internal storage error: {0}")]
    Internal(String),
}
