use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API reported {status}: {message}")]
    Api { status: String, message: String },
}
