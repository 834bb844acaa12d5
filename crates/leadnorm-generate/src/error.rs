use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("empty response")]
    EmptyResponse,
    #[error("missing API key: set {0}")]
    MissingApiKey(String),
    #[error("generation request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid generation response: {0}")]
    Decode(String),
    #[error("http generation not available: {0}")]
    Unavailable(String),
    #[cfg(feature = "http-generation")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "http-generation")]
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, GenerateError>;
