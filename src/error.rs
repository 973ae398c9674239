use thiserror::Error;

#[derive(Error, Debug)]
pub enum TolkaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Language '{0}' is not supported")]
    UnsupportedLanguage(String),

    #[error("No translation path from '{0}' to '{1}'")]
    PathUnavailable(String, String),

    #[error("No translation model available for {0}")]
    ModelUnavailable(String),

    #[error("Failed to load model '{model}': {cause}")]
    LoadFailure { model: String, cause: String },

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TolkaError {
    /// Whether the caller can correct the request by picking another
    /// language pair, as opposed to retrying later.
    pub fn is_client_correctable(&self) -> bool {
        matches!(
            self,
            TolkaError::UnsupportedLanguage(_)
                | TolkaError::PathUnavailable(_, _)
                | TolkaError::ModelUnavailable(_)
                | TolkaError::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TolkaError>;
