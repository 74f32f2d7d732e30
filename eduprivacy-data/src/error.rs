use thiserror::Error;

/// Errors from the PostgREST client layer.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}: {body}")]
    Api {
        url: String,
        status: u16,
        body: String,
    },

    #[error("unexpected payload from {name}: {detail}")]
    Decode { name: String, detail: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
