use jobconf_model::{Flag, INJECT_FILE, INJECT_SITE_CONFIGS, PropertySet};
use tracing::warn;

/// Resources every runtime configuration starts from.
pub const CORE_RESOURCES: [&str; 2] = ["core-default.xml", "core-site.xml"];

/// Site resources registered ahead of the injected one when enabled.
pub const SITE_RESOURCES: [&str; 6] = [
    "mapred-default.xml",
    "mapred-site.xml",
    "yarn-default.xml",
    "yarn-site.xml",
    "hdfs-default.xml",
    "hdfs-site.xml",
];

/// Ordered list of configuration resources; later entries override earlier ones.
///
/// Built per job and handed to [`crate::ConfigurationBuilder`]; there is no
/// process-wide registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRegistry {
    resources: Vec<String>,
}

impl ResourceRegistry {
    /// Registry with no resources at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding [`CORE_RESOURCES`].
    pub fn new() -> Self {
        let mut reg = Self::empty();
        for name in CORE_RESOURCES {
            reg.register(name);
        }
        reg
    }

    /// Resources loaded by a forked job.
    ///
    /// Site resources come first (unless `azkaban.inject.hadoop-site.configs`
    /// is false) so that the injected file, registered last, overrides them.
    pub fn for_job(job: &PropertySet) -> Self {
        let mut reg = Self::new();

        let site = job
            .get_flag_or(INJECT_SITE_CONFIGS, Flag::enabled())
            .unwrap_or_else(|e| {
                warn!(error = %e, "ignoring invalid site config toggle");
                Flag::enabled()
            });
        if site.is_enabled() {
            for name in SITE_RESOURCES {
                reg.register(name);
            }
        }

        reg.register(INJECT_FILE);
        reg
    }

    /// Append `name`. Already registered names keep their position.
    pub fn register(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.resources.contains(&name) {
            self.resources.push(name);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injected_file_is_registered_last_after_site_configs() {
        let reg = ResourceRegistry::for_job(&PropertySet::new());
        let names: Vec<_> = reg.iter().collect();

        assert_eq!(&names[..2], &CORE_RESOURCES[..]);
        assert_eq!(&names[2..8], &SITE_RESOURCES[..]);
        assert_eq!(names.last(), Some(&INJECT_FILE));
        assert_eq!(reg.len(), 9);
    }

    #[test]
    fn site_configs_can_be_disabled() {
        let job: PropertySet = [(INJECT_SITE_CONFIGS, "false")].into_iter().collect();
        let names: Vec<_> = ResourceRegistry::for_job(&job).iter().map(String::from).collect();

        assert_eq!(names, vec!["core-default.xml", "core-site.xml", INJECT_FILE]);
    }

    #[test]
    fn invalid_toggle_keeps_default() {
        let job: PropertySet = [(INJECT_SITE_CONFIGS, "maybe")].into_iter().collect();
        assert_eq!(ResourceRegistry::for_job(&job).len(), 9);
    }

    #[test]
    fn registering_twice_keeps_first_position() {
        let mut reg = ResourceRegistry::empty();
        reg.register("a.xml").register("b.xml").register("a.xml");

        let names: Vec<_> = reg.iter().collect();
        assert_eq!(names, vec!["a.xml", "b.xml"]);
    }

    #[test]
    fn registries_are_independent() {
        let mut one = ResourceRegistry::new();
        one.register("extra.xml");
        let two = ResourceRegistry::new();

        assert_eq!(one.len(), 3);
        assert_eq!(two.len(), 2);
    }
}
