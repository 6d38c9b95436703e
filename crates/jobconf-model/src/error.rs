use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid flag for '{key}': {value:?} (expected true|false)")]
    InvalidFlag { key: String, value: String },

    #[error("invalid value for '{key}': {value:?}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("missing property: {0}")]
    Missing(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
