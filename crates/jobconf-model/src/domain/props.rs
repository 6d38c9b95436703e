use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Flag, ModelError, ModelResult};

/// Ordered string properties scoped to one job invocation.
///
/// A key may be present with no value (`None`), which means "not set" and is
/// distinct from an empty string. Iteration follows insertion order;
/// re-inserting a key keeps its original position.
///
/// Serialized as a transparent JSON object where `null` marks an unset key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet(IndexMap<String, Option<String>>);

impl PropertySet {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set a property, overwriting any previous value.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), Some(value.into()));
        self
    }

    /// Record a key without a value.
    pub fn insert_unset<K: Into<String>>(&mut self, key: K) -> &mut Self {
        self.0.insert(key.into(), None);
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Value of `key`, or `None` when the key is absent or unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    /// Like [`PropertySet::get`], but treats an empty string as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Parse `key` as a [`Flag`].
    ///
    /// Returns `Ok(None)` when the key is unset.
    pub fn get_flag(&self, key: &str) -> ModelResult<Option<Flag>> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<Flag>()
                .map(Some)
                .map_err(|_| ModelError::InvalidFlag {
                    key: key.to_string(),
                    value: raw.to_string(),
                }),
        }
    }

    /// Parse `key` as a [`Flag`], falling back to `default` when unset.
    pub fn get_flag_or(&self, key: &str, default: Flag) -> ModelResult<Flag> {
        Ok(self.get_flag(key)?.unwrap_or(default))
    }

    /// Parse `key` with [`FromStr`]. Surrounding whitespace is ignored.
    pub fn get_parsed<T>(&self, key: &str) -> ModelResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| ModelError::InvalidValue {
                    key: key.to_string(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Value of `key`, or [`ModelError::Missing`] when unset or empty.
    pub fn require(&self, key: &str) -> ModelResult<&str> {
        self.get_non_empty(key)
            .ok_or_else(|| ModelError::Missing(key.to_string()))
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Iterate over keys starting with `prefix`, yielding the key with the prefix stripped.
    ///
    /// Full scan in insertion order; property sets are small.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + 'a {
        self.0.iter().filter_map(move |(k, v)| {
            k.strip_prefix(prefix)
                .map(|stripped| (stripped, v.as_deref()))
        })
    }
}

impl<K, V> FromIterator<(K, V)> for PropertySet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = PropertySet::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::PropertySet;
    use crate::{Flag, ModelError};

    #[test]
    fn unset_is_distinct_from_empty() {
        let mut props = PropertySet::new();
        props.insert("empty", "");
        props.insert_unset("unset");

        assert_eq!(props.get("empty"), Some(""));
        assert!(props.get("unset").is_none());
        assert!(props.contains_key("unset"));
        assert!(props.get_non_empty("empty").is_none());
        assert!(!props.contains_key("missing"));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let props: PropertySet = [("Key", "a")].into_iter().collect();
        assert_eq!(props.get("Key"), Some("a"));
        assert!(props.get("key").is_none());
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut props = PropertySet::new();
        props.insert("a", "1").insert("b", "2").insert("a", "3");

        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(props.get("a"), Some("3"));
    }

    #[test]
    fn flag_parsing_reports_key() {
        let props: PropertySet = [("on", "TRUE"), ("bad", "maybe")].into_iter().collect();

        assert_eq!(props.get_flag("on").unwrap(), Some(Flag::enabled()));
        assert_eq!(props.get_flag("absent").unwrap(), None);
        assert_eq!(
            props.get_flag_or("absent", Flag::enabled()).unwrap(),
            Flag::enabled()
        );

        let err = props.get_flag("bad").unwrap_err();
        assert!(matches!(err, ModelError::InvalidFlag { ref key, .. } if key == "bad"));
    }

    #[test]
    fn parsed_values_are_trimmed() {
        let props: PropertySet = [("n", " 250 "), ("x", "abc")].into_iter().collect();

        assert_eq!(props.get_parsed::<u64>("n").unwrap(), Some(250));
        assert_eq!(props.get_parsed::<u64>("none").unwrap(), None);
        assert!(matches!(
            props.get_parsed::<u64>("x"),
            Err(ModelError::InvalidValue { .. })
        ));
    }

    #[test]
    fn require_rejects_empty() {
        let props: PropertySet = [("a", ""), ("b", "v")].into_iter().collect();
        assert!(matches!(props.require("a"), Err(ModelError::Missing(_))));
        assert_eq!(props.require("b").unwrap(), "v");
    }

    #[test]
    fn with_prefix_strips_and_keeps_order() {
        let mut props = PropertySet::new();
        props.insert("p.b", "2");
        props.insert("other", "x");
        props.insert_unset("p.a");
        props.insert("p.", "root");

        let found: Vec<_> = props.with_prefix("p.").collect();
        assert_eq!(found, vec![("b", Some("2")), ("a", None), ("", Some("root"))]);
    }

    #[test]
    fn serde_null_means_unset() {
        let json = r#"{"a":"1","b":null}"#;
        let props: PropertySet = serde_json::from_str(json).unwrap();

        assert_eq!(props.get("a"), Some("1"));
        assert!(props.contains_key("b"));
        assert!(props.get("b").is_none());

        let back = serde_json::to_string(&props).unwrap();
        assert_eq!(back, json);
    }
}
