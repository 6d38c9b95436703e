use std::{io, path::PathBuf};

use jobconf_model::ModelError;
use thiserror::Error;

use crate::sink::SinkError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("azkaban.flow.nested.path and azkaban.job.id were not set")]
    MissingDirName,

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("invalid property: {0}")]
    Model(#[from] ModelError),
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
