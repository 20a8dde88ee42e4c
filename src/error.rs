use thiserror::Error;

/// Errors that can occur during geocoding operations
#[derive(Error, Debug)]
pub enum GeocodingError {
    #[error("Forward geocoding failed")]
    Forward,
    #[error("Reverse geocoding failed")]
    Reverse,
    #[error("HTTP request error")]
    Request(#[from] reqwest::Error),
    #[error("HTTP transport error: {0}")]
    Transport(String),
    #[error("Error parsing JSON response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed response: missing or invalid `{0}`")]
    MalformedResponse(&'static str),
}
