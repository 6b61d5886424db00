use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry responded with {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
