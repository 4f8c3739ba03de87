use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum BulletinError {
    #[error("Failed to read bulletin file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read bulletin stream: {0}")]
    Stream(#[source] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to serialize forecast: {0}")]
    Serialize(#[from] serde_json::Error),
}
