use thiserror::Error;

/// Why a weather query did not produce a report.
///
/// Every variant is terminal for the attempt that produced it; nothing here
/// is retried. `Display` yields the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Enter a city name.")]
    EmptyInput,

    #[error(
        "No API key configured. Set OPENWEATHER_API_KEY or run `raincard configure`."
    )]
    MissingCredential,

    #[error("City not found.")]
    CityNotFound,

    #[error("Invalid API key, or the key is not active yet. Wait a few minutes and try again.")]
    InvalidOrPendingCredential,

    #[error("{0}")]
    ProviderError(String),

    #[error("HTTP error while fetching weather data.")]
    HttpError,

    #[error("{0}")]
    UnexpectedError(String),
}

impl QueryError {
    /// Fallback text when the provider rejects a request without a message.
    pub const PROVIDER_FALLBACK: &'static str = "Error while fetching weather data.";

    /// Stable machine-readable code, e.g. for JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::EmptyInput => "EMPTY_INPUT",
            QueryError::MissingCredential => "MISSING_CREDENTIAL",
            QueryError::CityNotFound => "CITY_NOT_FOUND",
            QueryError::InvalidOrPendingCredential => "INVALID_OR_PENDING_CREDENTIAL",
            QueryError::ProviderError(_) => "PROVIDER_ERROR",
            QueryError::HttpError => "HTTP_ERROR",
            QueryError::UnexpectedError(_) => "UNEXPECTED_ERROR",
        }
    }
}
