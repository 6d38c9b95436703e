pub mod constants;

mod kv;
pub use kv::KeyValue;

mod flag;
pub use flag::Flag;

mod props;
pub use props::PropertySet;

mod merged;
pub use merged::{ConfigOverride, MergedConfig};

mod identity;
pub use identity::{ConsentFlags, JobIdentity};
