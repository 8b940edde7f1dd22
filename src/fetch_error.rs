#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("POWER API rejected the request: {0}")]
    ClientError(String),
    #[error("POWER API server error: {0}")]
    ServerError(String),
    #[error("Failed to decode POWER response: {0}")]
    Decode(String),
}
