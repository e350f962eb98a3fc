use thiserror::Error;

/// Failures surfaced by [`crate::WeatherService`].
///
/// Every variant is terminal for the request that produced it; none leaves
/// a partially written record behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// A required request field was missing or empty.
    #[error("{0}")]
    InvalidInput(String),

    /// The provider could not be reached or its reply could not be read.
    #[error("Error contacting WeatherStack API: {0}")]
    ProviderUnreachable(String),

    /// The provider answered but reported an error.
    #[error("{0}")]
    ProviderRejected(String),

    #[error("Weather data not found")]
    NotFound { id: String },
}
