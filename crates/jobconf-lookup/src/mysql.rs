use std::{fmt, time::Instant};

use jobconf_core::placement::{LookupError, MembershipLookup, MembershipQuery};
use sqlx::{
    Connection,
    mysql::{MySqlConnectOptions, MySqlConnection},
};
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, warn};

use crate::table::SqlTable;

/// [`MembershipLookup`] against a MySQL candidate table.
///
/// Each call opens one connection, runs a single parameterized existence
/// query and closes the connection again. Connect and query together are
/// bounded by [`jobconf_core::placement::LookupSettings::timeout`].
pub struct MySqlMembershipLookup {
    rt: Runtime,
}

impl MySqlMembershipLookup {
    /// Build the lookup together with the single-threaded runtime it drives.
    pub fn new() -> Result<Self, LookupError> {
        let rt = Builder::new_current_thread()
            .enable_all()
            .thread_name("jobconf-lookup")
            .build()
            .map_err(|e| LookupError::Internal(format!("runtime: {e}")))?;
        Ok(Self { rt })
    }

    fn statement(table: &SqlTable) -> String {
        format!(
            "SELECT 1 FROM {} WHERE jobname = ? AND flowname = ? AND projectname = ? LIMIT 1",
            table.quoted()
        )
    }

    async fn run(sql: &str, query: &MembershipQuery<'_>) -> Result<bool, LookupError> {
        let s = query.settings;
        let opts = MySqlConnectOptions::new()
            .host(&s.host)
            .port(s.port)
            .username(&s.username)
            .password(&s.password)
            .database(&s.database);

        let mut conn = MySqlConnection::connect_with(&opts)
            .await
            .map_err(|e| LookupError::Connect(e.to_string()))?;

        let id = query.identity;
        let row = sqlx::query(sql)
            .bind(id.job.as_str())
            .bind(id.flow.as_str())
            .bind(id.project.as_str())
            .fetch_optional(&mut conn)
            .await;

        if let Err(e) = conn.close().await {
            warn!(host = %s.host, error = %e, "failed to close lookup connection");
        }

        row.map(|r| r.is_some())
            .map_err(|e| LookupError::Query(e.to_string()))
    }
}

impl MembershipLookup for MySqlMembershipLookup {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn contains(&self, query: &MembershipQuery<'_>) -> Result<bool, LookupError> {
        if Handle::try_current().is_ok() {
            return Err(LookupError::Internal(
                "mysql lookup called from inside an async runtime".into(),
            ));
        }

        let table = SqlTable::parse(&query.settings.table)?;
        let sql = Self::statement(&table);
        let limit = query.settings.timeout;
        let started = Instant::now();

        let res = self.rt.block_on(async {
            tokio::time::timeout(limit, Self::run(&sql, query))
                .await
                .map_err(|_| LookupError::Timeout(limit))?
        });

        debug!(
            job = %query.identity,
            table = %table,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = res.is_ok(),
            "membership lookup finished",
        );
        res
    }
}

impl fmt::Debug for MySqlMembershipLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlMembershipLookup").finish_non_exhaustive()
    }
}
