// Fail-fast error taxonomy.
//
// Only the two validation families are typed: both must abort a run before
// any request is sent, and callers need to tell them apart. Everything
// downstream of validation flows through anyhow like the rest of the crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Term input could not be classified into a supported shape, or
    /// contains missing values.
    #[error("invalid term input: {0}")]
    InvalidInput(String),

    /// A run parameter is out of range or unrecognized.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
