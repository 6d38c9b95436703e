//! Runtime configuration assembled by the forked job process.
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use jobconf_model::PropertySet;
use tracing::{debug, trace};

use crate::{
    error::{CoreError, CoreResult},
    resource::ResourceRegistry,
    sink::{SinkError, read_config_xml},
};

/// Loads the resources of a [`ResourceRegistry`] from a list of directories.
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    registry: ResourceRegistry,
    search_dirs: Vec<PathBuf>,
}

impl ConfigurationBuilder {
    pub fn new(registry: ResourceRegistry) -> Self {
        Self {
            registry,
            search_dirs: Vec::new(),
        }
    }

    /// Append a directory to search. Earlier directories are searched first.
    pub fn search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    /// Read every registered resource in order; later resources override earlier ones.
    ///
    /// A resource found in no search directory is skipped. A resource that
    /// exists but cannot be read or parsed is an error.
    pub fn build(&self) -> CoreResult<RuntimeConfiguration> {
        let mut conf = RuntimeConfiguration::default();

        for name in self.registry.iter() {
            let Some(path) = self.locate(name) else {
                trace!(resource = name, "resource not found, skipping");
                continue;
            };

            let entries = read_config_xml(&path).map_err(|e| match e {
                SinkError::Io(source) => CoreError::io(&path, source),
                other => CoreError::Sink(other),
            })?;
            debug!(resource = name, path = %path.display(), entries = entries.len(), "loaded resource");

            for (k, v) in entries.iter() {
                conf.values.insert(k.to_string(), v.to_string());
            }
            conf.loaded.push(path);
        }

        Ok(conf)
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|p| p.is_file())
    }
}

/// Resolved key/value configuration of one job process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfiguration {
    values: IndexMap<String, String>,
    loaded: Vec<PathBuf>,
}

impl RuntimeConfiguration {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Copy job property `name` into the configuration when it is set.
    pub fn load_prop(&mut self, props: &PropertySet, name: &str) {
        if let Some(value) = props.get(name) {
            self.set(name, value);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Files that contributed to this configuration, in load order.
    pub fn loaded_resources(&self) -> impl Iterator<Item = &Path> {
        self.loaded.iter().map(|p| p.as_path())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use jobconf_model::{INJECT_FILE, INJECT_SITE_CONFIGS, MergedConfig};

    use super::*;
    use crate::sink::{ConfigSink, XmlConfigSink};

    fn write(dir: &Path, name: &str, pairs: &[(&str, &str)]) {
        let cfg: MergedConfig = pairs.iter().copied().collect();
        XmlConfigSink.write(&cfg, &dir.join(name)).unwrap();
    }

    #[test]
    fn injected_values_override_site_values() {
        let site = tempfile::tempdir().unwrap();
        let job_dir = tempfile::tempdir().unwrap();
        write(site.path(), "mapred-site.xml", &[("mapred.job.priority", "LOW"), ("a", "1")]);
        write(job_dir.path(), INJECT_FILE, &[("mapred.job.priority", "HIGH")]);

        let conf = ConfigurationBuilder::new(ResourceRegistry::for_job(&PropertySet::new()))
            .search_dir(job_dir.path())
            .search_dir(site.path())
            .build()
            .unwrap();

        assert_eq!(conf.get("mapred.job.priority"), Some("HIGH"));
        assert_eq!(conf.get("a"), Some("1"));
        assert_eq!(conf.loaded_resources().count(), 2);
    }

    #[test]
    fn disabled_site_configs_are_not_loaded() {
        let site = tempfile::tempdir().unwrap();
        write(site.path(), "yarn-site.xml", &[("yarn.only", "x")]);
        write(site.path(), "core-site.xml", &[("core.only", "y")]);

        let job: PropertySet = [(INJECT_SITE_CONFIGS, "false")].into_iter().collect();
        let conf = ConfigurationBuilder::new(ResourceRegistry::for_job(&job))
            .search_dir(site.path())
            .build()
            .unwrap();

        assert!(conf.get("yarn.only").is_none());
        assert_eq!(conf.get("core.only"), Some("y"));
    }

    #[test]
    fn first_search_dir_wins_for_same_resource() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        write(a.path(), "core-site.xml", &[("k", "from-a")]);
        write(b.path(), "core-site.xml", &[("k", "from-b")]);

        let conf = ConfigurationBuilder::new(ResourceRegistry::new())
            .search_dir(a.path())
            .search_dir(b.path())
            .build()
            .unwrap();

        assert_eq!(conf.get("k"), Some("from-a"));
    }

    #[test]
    fn missing_resources_yield_empty_configuration() {
        let empty = tempfile::tempdir().unwrap();
        let conf = ConfigurationBuilder::new(ResourceRegistry::for_job(&PropertySet::new()))
            .search_dir(empty.path())
            .build()
            .unwrap();
        assert!(conf.is_empty());
    }

    #[test]
    fn malformed_resource_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("core-default.xml"),
            "<configuration><property><value>v</value></property></configuration>",
        )
        .unwrap();

        let err = ConfigurationBuilder::new(ResourceRegistry::new())
            .search_dir(dir.path())
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::Sink(SinkError::Malformed(_))));
    }

    #[test]
    fn load_prop_copies_only_set_values() {
        let mut props: PropertySet = [("azkaban.job.id", "job1")].into_iter().collect();
        props.insert_unset("azkaban.flow.flowid");

        let mut conf = RuntimeConfiguration::default();
        conf.load_prop(&props, "azkaban.job.id");
        conf.load_prop(&props, "azkaban.flow.flowid");
        conf.load_prop(&props, "missing");

        assert_eq!(conf.get("azkaban.job.id"), Some("job1"));
        assert_eq!(conf.len(), 1);
    }
}
