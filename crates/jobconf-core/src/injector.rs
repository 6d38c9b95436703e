//! Merge, decide, write.
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
    sync::Arc,
};

use jobconf_model::{INJECT_FILE, JOB_ID, MergedConfig, PropertySet};
use tracing::{debug, error, info, info_span};

use crate::{
    error::CoreResult,
    merger::PropertyMerger,
    placement::PlacementAdvisor,
    resource::{conf_file, resource_path},
    sink::{ConfigSink, XmlConfigSink},
};

/// Produces the configuration resource injected into a forked job.
///
/// Without an advisor no placement decision is made.
#[derive(Clone)]
pub struct ConfigurationInjector {
    merger: PropertyMerger,
    advisor: Option<PlacementAdvisor>,
    sink: Arc<dyn ConfigSink>,
}

impl ConfigurationInjector {
    pub fn new() -> Self {
        Self {
            merger: PropertyMerger::new(),
            advisor: None,
            sink: Arc::new(XmlConfigSink),
        }
    }

    pub fn with_advisor(mut self, advisor: PlacementAdvisor) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ConfigSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Base mapping with the placement override, if any, applied last.
    pub fn merged_config(&self, job: &PropertySet, sys: &PropertySet) -> MergedConfig {
        let mut merged = self.merger.build_injection_mapping(job);

        if let Some(ov) = self
            .advisor
            .as_ref()
            .and_then(|advisor| advisor.should_elevate(job, sys))
        {
            merged.apply(ov);
        }
        merged
    }

    /// Write the resource and return its path.
    ///
    /// The resource directory is resolved before anything else; when the job
    /// has neither a nested flow path nor a job id nothing is written.
    pub fn try_prepare(
        &self,
        job: &PropertySet,
        sys: &PropertySet,
        working_dir: &Path,
    ) -> CoreResult<PathBuf> {
        let dir = resource_path(job, working_dir)?;
        debug!(dir = %dir.display(), "resolved resource directory");

        let merged = self.merged_config(job, sys);
        let path = conf_file(job, working_dir, INJECT_FILE)?;
        self.sink.write(&merged, &path)?;

        info!(path = %path.display(), entries = merged.len(), "configuration resource prepared");
        Ok(path)
    }

    /// Like [`ConfigurationInjector::try_prepare`], but never fails.
    ///
    /// Errors and panics are logged and reported as `None`; the job then
    /// starts with the cluster defaults.
    pub fn prepare(
        &self,
        job: &PropertySet,
        sys: &PropertySet,
        working_dir: &Path,
    ) -> Option<PathBuf> {
        let job_id = job.get(JOB_ID).unwrap_or("<unknown>");
        let _span = info_span!("prepare", job = %job_id).entered();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.try_prepare(job, sys, working_dir)
        }));

        match outcome {
            Ok(Ok(path)) => Some(path),
            Ok(Err(e)) => {
                error!(
                    working_dir = %working_dir.display(),
                    error = %e,
                    "failed to prepare configuration resource",
                );
                None
            }
            Err(payload) => {
                error!(
                    working_dir = %working_dir.display(),
                    panic = panic_message(payload.as_ref()),
                    "panic while preparing configuration resource",
                );
                None
            }
        }
    }
}

impl Default for ConfigurationInjector {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic>"
    }
}
