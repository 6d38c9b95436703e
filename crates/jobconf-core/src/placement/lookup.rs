use std::{fmt, time::Duration};

use jobconf_model::{
    ELASTIC_DB_HOSTNAME, ELASTIC_DB_NAME, ELASTIC_DB_PASSWORD, ELASTIC_DB_USERNAME,
    ELASTIC_TABLE_NAME, ELASTIC_TIMEOUT_MS, JobIdentity, ModelError, PropertySet,
};
use thiserror::Error;

/// Port used when `elastic.dbhostname` carries none.
pub const DEFAULT_DB_PORT: u16 = 3306;

/// Bound on connect plus query when `elastic.timeout.ms` is unset.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup not configured: {0}")]
    Config(String),

    #[error("invalid table name: {0:?}")]
    InvalidTable(String),

    #[error("connect failed: {0}")]
    Connect(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ModelError> for LookupError {
    fn from(e: ModelError) -> Self {
        LookupError::Config(e.to_string())
    }
}

/// Connection parameters of the membership store.
///
/// Always read from the system properties. A job cannot point the lookup
/// at a store of its choosing.
#[derive(Clone, PartialEq, Eq)]
pub struct LookupSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub table: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl LookupSettings {
    pub fn from_props(sys: &PropertySet) -> Result<Self, LookupError> {
        let (host, port) = split_host_port(sys.require(ELASTIC_DB_HOSTNAME)?)?;
        let timeout = match sys.get_parsed::<u64>(ELASTIC_TIMEOUT_MS)? {
            None => DEFAULT_LOOKUP_TIMEOUT,
            Some(0) => {
                return Err(LookupError::Config(format!(
                    "{ELASTIC_TIMEOUT_MS} must be greater than zero"
                )));
            }
            Some(ms) => Duration::from_millis(ms),
        };

        Ok(Self {
            host,
            port,
            database: sys.require(ELASTIC_DB_NAME)?.to_string(),
            table: sys.require(ELASTIC_TABLE_NAME)?.to_string(),
            username: sys.require(ELASTIC_DB_USERNAME)?.to_string(),
            password: sys.get(ELASTIC_DB_PASSWORD).unwrap_or_default().to_string(),
            timeout,
        })
    }
}

impl fmt::Debug for LookupSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("table", &self.table)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Accepts `host` or `host:port`. Bracketed IPv6 literals keep their brackets off.
fn split_host_port(raw: &str) -> Result<(String, u16), LookupError> {
    let raw = raw.trim();
    let invalid = || LookupError::Config(format!("invalid {ELASTIC_DB_HOSTNAME}: {raw:?}"));

    if let Some(rest) = raw.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
        let port = match tail.strip_prefix(':') {
            Some(p) => p.parse().map_err(|_| invalid())?,
            None if tail.is_empty() => DEFAULT_DB_PORT,
            None => return Err(invalid()),
        };
        return Ok((host.to_string(), port));
    }

    match raw.split_once(':') {
        Some((host, port)) if !host.is_empty() => {
            Ok((host.to_string(), port.parse().map_err(|_| invalid())?))
        }
        Some(_) => Err(invalid()),
        None if raw.is_empty() => Err(invalid()),
        None => Ok((raw.to_string(), DEFAULT_DB_PORT)),
    }
}

/// One membership check: is this job listed in the store?
#[derive(Debug, Clone, Copy)]
pub struct MembershipQuery<'a> {
    pub identity: &'a JobIdentity,
    pub settings: &'a LookupSettings,
}

/// External store listing the jobs eligible for priority placement.
///
/// Implementations match the (project, flow, job) triple exactly, bind every
/// job-supplied value as a query parameter and release their resources
/// before returning, on success and on failure alike.
pub trait MembershipLookup: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// `Ok(true)` when at least one row matches the triple.
    fn contains(&self, query: &MembershipQuery<'_>) -> Result<bool, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sys_props() -> PropertySet {
        [
            (ELASTIC_DB_HOSTNAME, "db.internal:3307"),
            (ELASTIC_DB_NAME, "grid"),
            (ELASTIC_TABLE_NAME, "candidate_jobs"),
            (ELASTIC_DB_USERNAME, "reader"),
            (ELASTIC_DB_PASSWORD, "s3cret"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn settings_from_system_props() {
        let s = LookupSettings::from_props(&sys_props()).unwrap();
        assert_eq!(s.host, "db.internal");
        assert_eq!(s.port, 3307);
        assert_eq!(s.database, "grid");
        assert_eq!(s.table, "candidate_jobs");
        assert_eq!(s.username, "reader");
        assert_eq!(s.password, "s3cret");
        assert_eq!(s.timeout, DEFAULT_LOOKUP_TIMEOUT);
    }

    #[test]
    fn missing_parameters_are_config_errors() {
        for key in [
            ELASTIC_DB_HOSTNAME,
            ELASTIC_DB_NAME,
            ELASTIC_TABLE_NAME,
            ELASTIC_DB_USERNAME,
        ] {
            let mut sys = sys_props();
            sys.insert_unset(key);
            let err = LookupSettings::from_props(&sys).unwrap_err();
            assert!(matches!(err, LookupError::Config(_)), "{key}: {err}");
        }
    }

    #[test]
    fn password_may_be_absent() {
        let mut sys = sys_props();
        sys.insert_unset(ELASTIC_DB_PASSWORD);
        assert_eq!(LookupSettings::from_props(&sys).unwrap().password, "");
    }

    #[test]
    fn timeout_is_configurable_and_positive() {
        let mut sys = sys_props();
        sys.insert(ELASTIC_TIMEOUT_MS, "750");
        assert_eq!(
            LookupSettings::from_props(&sys).unwrap().timeout,
            Duration::from_millis(750)
        );

        sys.insert(ELASTIC_TIMEOUT_MS, "0");
        assert!(LookupSettings::from_props(&sys).is_err());

        sys.insert(ELASTIC_TIMEOUT_MS, "soon");
        assert!(LookupSettings::from_props(&sys).is_err());
    }

    #[test]
    fn host_port_forms() {
        assert_eq!(split_host_port("db").unwrap(), ("db".into(), DEFAULT_DB_PORT));
        assert_eq!(split_host_port(" db:1 ").unwrap(), ("db".into(), 1));
        assert_eq!(split_host_port("[::1]").unwrap(), ("::1".into(), DEFAULT_DB_PORT));
        assert_eq!(split_host_port("[::1]:3310").unwrap(), ("::1".into(), 3310));

        for bad in ["", ":3306", "db:", "db:port", "[::1", "[::1]x"] {
            assert!(split_host_port(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn debug_redacts_password() {
        let s = LookupSettings::from_props(&sys_props()).unwrap();
        let out = format!("{s:?}");
        assert!(!out.contains("s3cret"));
        assert!(out.contains("<redacted>"));
    }
}
