#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("Steam API key not set")]
    KeyNotSet,

    #[error("Steam session not set")]
    SessionNotSet,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SteamError {
    /// A required credential was missing when the call was made.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::KeyNotSet | Self::SessionNotSet)
    }

    /// The request failed on the wire, timed out, or came back with a bad status.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, SteamError>;
