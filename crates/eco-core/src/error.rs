//! Error types for the ecosystem core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Organism not found: {0}")]
    OrganismNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidInput(reason.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Error::OrganismNotFound(id.into())
    }
}
