use thiserror::Error;
use tourlead_core::InputError;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid lexicon: {0}")]
    Lexicon(#[from] InputError),

    #[error("classifier returned invalid weights: {0}")]
    InvalidResponse(String),
}
