use thiserror::Error;

/// Why a user fetch failed. The view model only cares that it failed; the
/// tag is kept for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid user endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("user request failed: {0}")]
    Transport(String),
    #[error("user endpoint returned status {0}")]
    Status(u16),
    #[error("invalid user response payload: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint(_) => "endpoint",
            Self::Transport(_) => "network",
            Self::Status(_) => "status",
            Self::Decode(_) => "decode",
        }
    }
}
