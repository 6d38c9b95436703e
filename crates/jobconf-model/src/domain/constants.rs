//! Well-known property keys and file names.
//!
//! The orchestrator publishes job metadata under fixed `azkaban.*` keys.
//! Keeping them here avoids scattering magic strings throughout the codebase.

/// Prefix marking a job property for injection into the cluster configuration.
///
/// `hadoop-inject.mapred.job.priority = HIGH` becomes `mapred.job.priority = HIGH`.
pub const INJECT_PREFIX: &str = "hadoop-inject.";

/// Name of the configuration resource written for the forked job process.
pub const INJECT_FILE: &str = "hadoop-inject.xml";

/// Prefix of the per-job resource directory under the working directory.
pub const RESOURCE_DIR_PREFIX: &str = "_resources_";

pub const EXEC_ID: &str = "azkaban.flow.execid";
pub const FLOW_ID: &str = "azkaban.flow.flowid";
pub const JOB_ID: &str = "azkaban.job.id";
pub const PROJECT_NAME: &str = "azkaban.flow.projectname";
pub const PROJECT_VERSION: &str = "azkaban.flow.projectversion";
pub const EXECUTION_LINK: &str = "azkaban.link.execution.url";
pub const JOB_LINK: &str = "azkaban.link.job.url";
pub const WORKFLOW_LINK: &str = "azkaban.link.workflow.url";
pub const JOBEXEC_LINK: &str = "azkaban.link.jobexec.url";
pub const ATTEMPT_LINK: &str = "azkaban.link.attempt.url";
pub const OUT_NODES: &str = "azkaban.job.outnodes";
pub const IN_NODES: &str = "azkaban.job.innodes";
pub const PROJECT_LAST_CHANGED_DATE: &str = "azkaban.flow.projectlastchangeddate";
pub const PROJECT_LAST_CHANGED_BY: &str = "azkaban.flow.projectlastchangedby";
pub const SUBMIT_USER: &str = "azkaban.flow.submituser";

/// Path of a job inside nested flows (`outer:inner:job`).
pub const NESTED_FLOW_PATH: &str = "azkaban.flow.nested.path";

/// Job-level toggle: also register the cluster's site configuration resources.
pub const INJECT_SITE_CONFIGS: &str = "azkaban.inject.hadoop-site.configs";

/// Link properties copied verbatim into the injected configuration, in order.
pub const LINK_PROPERTIES: [&str; 15] = [
    EXEC_ID,
    FLOW_ID,
    JOB_ID,
    PROJECT_NAME,
    PROJECT_VERSION,
    EXECUTION_LINK,
    JOB_LINK,
    WORKFLOW_LINK,
    JOBEXEC_LINK,
    ATTEMPT_LINK,
    OUT_NODES,
    IN_NODES,
    PROJECT_LAST_CHANGED_DATE,
    PROJECT_LAST_CHANGED_BY,
    SUBMIT_USER,
];

/// Job-level consent to run on the restricted pool.
pub const ELASTIC_CONSENT: &str = "elastic.consent";

/// System-level switch for the priority placement feature.
pub const ELASTIC_SWITCH: &str = "elastic.switch";

// Membership lookup connection parameters. Read from system properties only.
pub const ELASTIC_DB_HOSTNAME: &str = "elastic.dbhostname";
pub const ELASTIC_DB_NAME: &str = "elastic.database";
pub const ELASTIC_TABLE_NAME: &str = "elastic.table";
pub const ELASTIC_DB_USERNAME: &str = "elastic.usernameDB";
pub const ELASTIC_DB_PASSWORD: &str = "elastic.passwordDB";
pub const ELASTIC_TIMEOUT_MS: &str = "elastic.timeout.ms";

/// Configuration key selecting the resource queue of a submitted job.
pub const QUEUE_NAME_KEY: &str = "mapred.job.queue.name";

/// Queue identifier of the priority pool.
pub const PRIORITY_QUEUE: &str = "highlight";
