use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// Final configuration handed to the serializer.
///
/// Keys are unique and keep the position of their first insertion; a later
/// [`MergedConfig::set`] replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergedConfig(IndexMap<String, String>);

impl MergedConfig {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set `key`, replacing an earlier value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply `ov` on top of this configuration. Override values win.
    pub fn apply(&mut self, ov: ConfigOverride) {
        for kv in ov.0 {
            let (k, v) = kv.into_parts();
            self.0.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for MergedConfig
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = MergedConfig::new();
        for (k, v) in iter {
            out.set(k, v);
        }
        out
    }
}

/// Entries to force on top of a [`MergedConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigOverride(Vec<KeyValue>);

impl ConfigOverride {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Override holding a single entry.
    pub fn single<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(vec![KeyValue::new(key, value)])
    }

    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push(KeyValue::new(key, value));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigOverride, MergedConfig};

    #[test]
    fn set_replaces_without_duplicating() {
        let mut cfg = MergedConfig::new();
        cfg.set("a", "1");
        cfg.set("b", "2");
        cfg.set("a", "3");

        assert_eq!(cfg.len(), 2);
        assert_eq!(cfg.get("a"), Some("3"));
        let keys: Vec<_> = cfg.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn override_wins_on_collision() {
        let mut cfg: MergedConfig = [("mapred.job.queue.name", "default"), ("x", "1")]
            .into_iter()
            .collect();

        let mut ov = ConfigOverride::single("mapred.job.queue.name", "highlight");
        ov.push("y", "2");
        cfg.apply(ov);

        assert_eq!(cfg.get("mapred.job.queue.name"), Some("highlight"));
        assert_eq!(cfg.get("x"), Some("1"));
        assert_eq!(cfg.get("y"), Some("2"));
        assert_eq!(cfg.len(), 3);
    }

    #[test]
    fn empty_override_is_noop() {
        let mut cfg: MergedConfig = [("a", "1")].into_iter().collect();
        let before = cfg.clone();
        cfg.apply(ConfigOverride::new());
        assert_eq!(cfg, before);
    }
}
