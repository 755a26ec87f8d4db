//! Error types for the analytics engine.

use thiserror::Error;

/// Crate-wide error type.
///
/// Numerical degeneracies (too few points, zero variance, singular normal
/// equations) are NOT errors anywhere in this crate: the affected function
/// returns a neutral result instead. Errors are reserved for the external
/// store boundary and malformed caller input.
#[derive(Error, Debug)]
pub enum Error {
    /// The external ticket store query failed. Propagated to the caller
    /// unchanged; the engine performs no retry.
    #[error("upstream query failed: {0}")]
    Upstream(String),

    /// A granularity string could not be parsed.
    #[error("invalid granularity: {0}")]
    InvalidGranularity(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
