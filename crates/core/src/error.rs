//! Error types shared across the calculator crates

use thiserror::Error;

/// Core error type
///
/// The estimation pipeline itself is infallible; these errors come from the
/// operations around it (applying templates, looking up presets, encoding).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown catalog key: {0}")]
    UnknownKey(String),

    #[error("Unknown industry template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown add-on tier: {0}")]
    UnknownAddonTier(String),

    #[error("Unknown preset tier: {0}")]
    UnknownTier(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
