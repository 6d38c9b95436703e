use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::logger::{
    error::LoggerError,
    object::{LoggerFormat, LoggerLevel, LoggerTimeZone},
};

/// Environment variable holding the filter expression.
pub const ENV_LEVEL: &str = "JOBCONF_LOG";
/// Environment variable holding the output format (`text`|`json`).
pub const ENV_FORMAT: &str = "JOBCONF_LOG_FORMAT";
/// Environment variable holding the timestamp timezone (`utc`|`local`).
pub const ENV_TZ: &str = "JOBCONF_LOG_TZ";

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression (e.g. `"info"`, `"jobconf_core=debug,warn"`).
    pub level: LoggerLevel,
    /// Timezone for timestamps.
    pub tz: LoggerTimeZone,
    /// Include module/target names.
    pub with_targets: bool,
    /// Colored output when stderr is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Defaults overridden by `JOBCONF_LOG`, `JOBCONF_LOG_FORMAT` and `JOBCONF_LOG_TZ`.
    pub fn from_env() -> Result<Self, LoggerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LoggerConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(level) = lookup(ENV_LEVEL) {
            cfg.level = level.parse()?;
        }
        if let Some(format) = lookup(ENV_FORMAT) {
            cfg.format = format.parse()?;
        }
        if let Some(tz) = lookup(ENV_TZ) {
            cfg.tz = tz.parse()?;
        }
        Ok(cfg)
    }

    /// Color only when enabled and stderr is a terminal.
    ///
    /// Logs go to stderr; stdout is reserved for command output.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_values() {
        let config = LoggerConfig::default();

        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.tz, LoggerTimeZone::Utc);
        assert_eq!(config.level.as_str(), "info");
        assert!(config.with_targets);
        assert!(config.use_color);
    }

    #[test]
    fn lookup_overrides_defaults() {
        let cfg = LoggerConfig::from_lookup(lookup_from(&[
            (ENV_LEVEL, "jobconf_core=debug,warn"),
            (ENV_FORMAT, "JSON"),
        ]))
        .unwrap();

        assert_eq!(cfg.level.as_str(), "jobconf_core=debug,warn");
        assert_eq!(cfg.format, LoggerFormat::Json);
        assert_eq!(cfg.tz, LoggerTimeZone::Utc);
    }

    #[test]
    fn lookup_rejects_bad_values() {
        let err = LoggerConfig::from_lookup(lookup_from(&[(ENV_FORMAT, "xml")])).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidFormat(_)));

        let err = LoggerConfig::from_lookup(lookup_from(&[(ENV_TZ, "pst")])).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidTimeZone(_)));
    }

    #[test]
    fn serde_uses_defaults_for_missing_fields() {
        let config: LoggerConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();

        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "info");
        assert!(config.with_targets);
    }
}
