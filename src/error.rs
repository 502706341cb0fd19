#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any upstream failure: non-2xx status, transport error or undecodable body.
    #[error("Failed to fetch {endpoint}: {reason}")]
    Fetch { endpoint: String, reason: String },

    #[error("Image host not allowed: {0}")]
    ImageHostNotAllowed(String),

    #[error("Image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Failed to launch player: {0}")]
    PlayerLaunch(String),
}

impl Error {
    pub fn fetch(endpoint: &str, reason: impl std::fmt::Display) -> Self {
        Error::Fetch {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
