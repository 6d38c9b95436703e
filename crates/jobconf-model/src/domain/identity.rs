use std::fmt;

use crate::{
    ELASTIC_CONSENT, ELASTIC_SWITCH, FLOW_ID, Flag, JOB_ID, PROJECT_NAME, PropertySet,
};

/// Identity of a job within the orchestrator: project, flow and job name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobIdentity {
    pub project: String,
    pub flow: String,
    pub job: String,
}

impl JobIdentity {
    /// Read the identity from job properties.
    ///
    /// Returns `None` unless all three names are set and non-empty.
    pub fn from_props(props: &PropertySet) -> Option<Self> {
        Some(Self {
            project: props.get_non_empty(PROJECT_NAME)?.to_string(),
            flow: props.get_non_empty(FLOW_ID)?.to_string(),
            job: props.get_non_empty(JOB_ID)?.to_string(),
        })
    }
}

impl fmt::Display for JobIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.project, self.flow, self.job)
    }
}

/// Operator consent to priority placement.
///
/// `user_consent` comes from the job, `feature_enabled` from the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsentFlags {
    pub user_consent: Flag,
    pub feature_enabled: Flag,
}

impl ConsentFlags {
    /// Read both flags. Unset or unparseable values count as disabled.
    pub fn from_props(job: &PropertySet, sys: &PropertySet) -> Self {
        Self {
            user_consent: lenient_flag(job, ELASTIC_CONSENT),
            feature_enabled: lenient_flag(sys, ELASTIC_SWITCH),
        }
    }
}

fn lenient_flag(props: &PropertySet, key: &str) -> Flag {
    props.get_flag(key).ok().flatten().unwrap_or_default()
}
