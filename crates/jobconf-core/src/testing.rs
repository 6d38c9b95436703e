//! Test doubles shared by the unit tests of this crate.
use std::sync::{Arc, Mutex};

use jobconf_model::{
    ELASTIC_DB_HOSTNAME, ELASTIC_DB_NAME, ELASTIC_DB_PASSWORD, ELASTIC_DB_USERNAME,
    ELASTIC_SWITCH, ELASTIC_TABLE_NAME, JobIdentity, PropertySet,
};

use crate::placement::{LookupError, MembershipLookup, MembershipQuery};

#[derive(Debug, Clone, Copy)]
enum Reply {
    Rows(bool),
    Fail,
}

/// Lookup returning a canned answer and recording `(identity, host)` per call.
pub(crate) struct RecordingLookup {
    reply: Reply,
    calls: Mutex<Vec<(JobIdentity, String)>>,
}

impl RecordingLookup {
    fn with(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn matching() -> Arc<Self> {
        Self::with(Reply::Rows(true))
    }

    pub(crate) fn empty() -> Arc<Self> {
        Self::with(Reply::Rows(false))
    }

    pub(crate) fn failing() -> Arc<Self> {
        Self::with(Reply::Fail)
    }

    pub(crate) fn calls(&self) -> Vec<(JobIdentity, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl MembershipLookup for RecordingLookup {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn contains(&self, query: &MembershipQuery<'_>) -> Result<bool, LookupError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.identity.clone(), query.settings.host.clone()));
        match self.reply {
            Reply::Rows(found) => Ok(found),
            Reply::Fail => Err(LookupError::Connect("connection refused".into())),
        }
    }
}

/// System properties with the feature switched on and a complete connection.
pub(crate) fn elastic_sys_props() -> PropertySet {
    [
        (ELASTIC_SWITCH, "true"),
        (ELASTIC_DB_HOSTNAME, "db.internal"),
        (ELASTIC_DB_NAME, "grid"),
        (ELASTIC_TABLE_NAME, "candidate_jobs"),
        (ELASTIC_DB_USERNAME, "reader"),
        (ELASTIC_DB_PASSWORD, "secret"),
    ]
    .into_iter()
    .collect()
}
