use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(reqwest::StatusCode),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
