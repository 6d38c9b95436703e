//! Priority placement decision.
//!
//! A job is moved to the priority queue only when, in this order:
//! 1. its identity (project, flow, job) is complete;
//! 2. the system switch `elastic.switch` is on;
//! 3. the job consents via `elastic.consent`;
//! 4. the membership store lists the exact identity triple.
//!
//! Every failed check means "no override". Lookup errors are logged and
//! never reach the caller.
mod lookup;
pub use lookup::{
    DEFAULT_DB_PORT, DEFAULT_LOOKUP_TIMEOUT, LookupError, LookupSettings, MembershipLookup,
    MembershipQuery,
};

use std::sync::Arc;

use jobconf_model::{
    ConfigOverride, ConsentFlags, JobIdentity, PRIORITY_QUEUE, PropertySet, QUEUE_NAME_KEY,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Which checks gate the lookup, and what an approval sets.
///
/// The identity check and the lookup itself always apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementPolicy {
    pub require_feature_switch: bool,
    pub require_consent: bool,
    pub queue_key: String,
    pub queue_name: String,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            require_feature_switch: true,
            require_consent: true,
            queue_key: QUEUE_NAME_KEY.to_string(),
            queue_name: PRIORITY_QUEUE.to_string(),
        }
    }
}

/// Decides whether a job is elevated to the priority queue.
#[derive(Clone)]
pub struct PlacementAdvisor {
    lookup: Arc<dyn MembershipLookup>,
    policy: PlacementPolicy,
}

impl PlacementAdvisor {
    pub fn new(lookup: Arc<dyn MembershipLookup>) -> Self {
        Self {
            lookup,
            policy: PlacementPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PlacementPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &PlacementPolicy {
        &self.policy
    }

    /// Override to apply when the job qualifies, `None` otherwise.
    ///
    /// Connection parameters come from `sys` only.
    pub fn should_elevate(&self, job: &PropertySet, sys: &PropertySet) -> Option<ConfigOverride> {
        let Some(identity) = JobIdentity::from_props(job) else {
            debug!("job identity incomplete, placement skipped");
            return None;
        };

        let flags = ConsentFlags::from_props(job, sys);
        if self.policy.require_feature_switch && flags.feature_enabled.is_disabled() {
            debug!(job = %identity, "placement feature disabled");
            return None;
        }
        if self.policy.require_consent && flags.user_consent.is_disabled() {
            debug!(job = %identity, "job did not consent to priority placement");
            return None;
        }

        let settings = match LookupSettings::from_props(sys) {
            Ok(s) => s,
            Err(e) => {
                warn!(job = %identity, error = %e, "placement lookup misconfigured");
                return None;
            }
        };

        let query = MembershipQuery {
            identity: &identity,
            settings: &settings,
        };
        match self.lookup.contains(&query) {
            Ok(true) => {
                info!(
                    job = %identity,
                    lookup = self.lookup.name(),
                    queue = %self.policy.queue_name,
                    "job elevated to priority queue",
                );
                Some(ConfigOverride::single(
                    self.policy.queue_key.as_str(),
                    self.policy.queue_name.as_str(),
                ))
            }
            Ok(false) => {
                debug!(job = %identity, lookup = self.lookup.name(), "job not listed for priority placement");
                None
            }
            Err(e) => {
                warn!(
                    job = %identity,
                    lookup = self.lookup.name(),
                    host = %settings.host,
                    error = %e,
                    "placement lookup failed, keeping default queue",
                );
                None
            }
        }
    }
}
