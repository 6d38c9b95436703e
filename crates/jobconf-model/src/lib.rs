mod domain;
pub use domain::constants::*;
pub use domain::{ConfigOverride, ConsentFlags, Flag, JobIdentity, KeyValue, MergedConfig, PropertySet};

mod error;
pub use error::{ModelError, ModelResult};
