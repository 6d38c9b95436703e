//! Base mapping of the injected configuration.
//!
//! Two sources feed the mapping, in this order:
//! 1. the fixed link table ([`LINK_PROPERTIES`]), copied under the same key;
//! 2. every job property carrying [`INJECT_PREFIX`], copied with the prefix stripped.
//!
//! The second pass wins when both produce the same key.
use jobconf_model::{INJECT_PREFIX, LINK_PROPERTIES, MergedConfig, PropertySet};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy)]
pub struct PropertyMerger {
    prefix: &'static str,
    links: &'static [&'static str],
}

impl PropertyMerger {
    pub fn new() -> Self {
        Self {
            prefix: INJECT_PREFIX,
            links: &LINK_PROPERTIES,
        }
    }

    /// Build the mapping to inject for one job invocation.
    ///
    /// Unset values and blank destination keys are skipped; nothing here fails.
    pub fn build_injection_mapping(&self, job: &PropertySet) -> MergedConfig {
        let mut out = MergedConfig::new();

        for &name in self.links {
            if let Some(value) = job.get(name) {
                out.set(name, value);
            }
        }
        let links = out.len();

        let mut explicit = 0usize;
        for (dest, value) in job.with_prefix(self.prefix) {
            let Some(value) = value else {
                trace!(key = %dest, "skipping unset injected property");
                continue;
            };
            if dest.trim().is_empty() {
                trace!("skipping bare injection prefix");
                continue;
            }
            out.set(dest, value);
            explicit += 1;
        }

        debug!(links, explicit, total = out.len(), "built injection mapping");
        out
    }
}

impl Default for PropertyMerger {
    fn default() -> Self {
        Self::new()
    }
}
