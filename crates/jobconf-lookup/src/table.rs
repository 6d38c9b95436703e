use std::fmt;

use jobconf_core::placement::LookupError;

/// Validated table reference, `table` or `schema.table`.
///
/// Table names cannot be bound as query parameters, so they are restricted
/// to `[A-Za-z0-9_$]` and always emitted backtick-quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTable {
    schema: Option<String>,
    name: String,
}

impl SqlTable {
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let raw = raw.trim();
        let invalid = || LookupError::InvalidTable(raw.to_string());

        let (schema, name) = match raw.split_once('.') {
            Some((schema, name)) => (Some(schema), name),
            None => (None, raw),
        };
        if !is_identifier(name) || schema.is_some_and(|s| !is_identifier(s)) {
            return Err(invalid());
        }

        Ok(Self {
            schema: schema.map(str::to_string),
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Backtick-quoted form for use in SQL text.
    pub fn quoted(&self) -> String {
        match &self.schema {
            Some(schema) => format!("`{schema}`.`{}`", self.name),
            None => format!("`{}`", self.name),
        }
    }
}

impl fmt::Display for SqlTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 64
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
