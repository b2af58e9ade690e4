use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Backend returned no {0} row")]
    MissingRow(&'static str),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// True when the failure means the caller's token was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. } | Self::Status { status: 403, .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Required fields are missing")]
    MissingFields,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("No file was uploaded")]
    MissingFile,

    #[error("Upload exceeds {0} bytes")]
    TooLarge(usize),

    #[error("Malformed form data: {0}")]
    Malformed(String),
}
