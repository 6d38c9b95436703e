//! Persistence of the merged configuration.
mod xml;
pub use xml::{XmlConfigSink, parse_config_xml, read_config_xml, to_xml_string};

use std::{io, path::Path};

use jobconf_model::MergedConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("xml encoding failed: {0}")]
    Encode(String),

    #[error("malformed configuration resource: {0}")]
    Malformed(String),
}

/// Writes a [`MergedConfig`] where the forked job process will load it.
pub trait ConfigSink: Send + Sync {
    fn write(&self, config: &MergedConfig, path: &Path) -> Result<(), SinkError>;
}
