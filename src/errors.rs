use thiserror::Error;

/// Startup configuration errors. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FATAL ERROR: Please set your GOOGLE_API_KEY environment variable.")]
    MissingApiKey,
    #[error("Invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// A failed call to the model service. Recoverable: reported to the user
/// and the session keeps going.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Rate limited by the model service (quota exceeded?)")]
    RateLimited,
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response: {0}")]
    Parse(String),
    #[error("The model returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Timeout
        } else if e.is_decode() {
            ServiceError::Parse(e.to_string())
        } else {
            ServiceError::Network(e.to_string())
        }
    }
}

/// Gembot errors
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("Failed to register signal handler: {0}")]
    SignalHandler(#[source] std::io::Error),
    #[error(transparent)]
    StdioError(#[from] std::io::Error),
}
