use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("No such attribute: {0:?}")]
    UnknownAttribute(String),

    #[error("Attribute {0:?} doesn't have a composite setter")]
    MissingCompositeSetter(String),

    #[error("Unknown attribute type: {0}")]
    UnknownType(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),
}

pub type Result<T> = std::result::Result<T, FormError>;
