pub mod error;
pub mod merger;
pub mod placement;
pub mod resource;
pub mod runtime;
pub mod sink;

mod injector;
pub use injector::ConfigurationInjector;

#[cfg(test)]
mod testing;

pub use error::{CoreError, CoreResult};

pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::injector::ConfigurationInjector;
    pub use crate::merger::PropertyMerger;
    pub use crate::placement::{
        LookupError, LookupSettings, MembershipLookup, MembershipQuery, PlacementAdvisor,
        PlacementPolicy,
    };
    pub use crate::resource::{ResourceRegistry, conf_file, resource_dir_name, resource_path};
    pub use crate::runtime::{ConfigurationBuilder, RuntimeConfiguration};
    pub use crate::sink::{ConfigSink, SinkError, XmlConfigSink};
}
