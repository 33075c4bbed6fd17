//! Error types for the diet_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for diet_core operations
///
/// The calculators never return this; it covers validation at the
/// boundary and the storage collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected at the boundary
    #[error("Validation error: {0}")]
    Validation(String),

    /// Profile is missing or incomplete for the requested operation
    #[error("Profile error: {0}")]
    Profile(String),

    /// Generated meal plan could not be parsed or is malformed
    #[error("Meal plan error: {0}")]
    MealPlan(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
